//! Runtime configuration assembled from command-line flags and environment

use crate::{Result, UsageError};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 10;

/// Where cluster connection parameters come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// kube's default discovery: `KUBECONFIG`, `~/.kube/config`, then in-cluster
    Infer,
    /// Service account token and CA mounted into the pod
    InCluster,
    Kubeconfig {
        path: PathBuf,
        context: Option<String>,
    },
}

impl CredentialSource {
    pub fn from_flags(
        kubeconfig: Option<PathBuf>,
        context: Option<String>,
        in_cluster: bool,
    ) -> Result<Self> {
        match (kubeconfig, context, in_cluster) {
            (None, None, false) => Ok(CredentialSource::Infer),
            (None, None, true) => Ok(CredentialSource::InCluster),
            (Some(path), context, false) => Ok(CredentialSource::Kubeconfig { path, context }),
            (Some(_), _, true) => Err(UsageError::ConfigError(
                "--kubeconfig and --in-cluster are mutually exclusive".to_string(),
            )),
            (None, Some(_), _) => Err(UsageError::ConfigError(
                "--context requires --kubeconfig".to_string(),
            )),
        }
    }
}

/// Settings for the scrape server
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub listen: SocketAddr,
    pub scrape_timeout: Duration,
    /// Mirror every served sample into the log
    pub log_samples: bool,
}

impl ServeConfig {
    pub fn new(listen: &str, scrape_timeout_secs: u64) -> Result<Self> {
        let listen = listen.parse().map_err(|e| {
            UsageError::ConfigError(format!("Invalid listen address {:?}: {}", listen, e))
        })?;

        if scrape_timeout_secs == 0 {
            return Err(UsageError::ConfigError(
                "Scrape timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            listen,
            scrape_timeout: Duration::from_secs(scrape_timeout_secs),
            log_samples: false,
        })
    }

    pub fn with_log_samples(mut self, enabled: bool) -> Self {
        self.log_samples = enabled;
        self
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            scrape_timeout: Duration::from_secs(DEFAULT_SCRAPE_TIMEOUT_SECS),
            log_samples: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_source_defaults_to_infer() {
        let source = CredentialSource::from_flags(None, None, false).unwrap();
        assert_eq!(source, CredentialSource::Infer);
    }

    #[test]
    fn test_credential_source_kubeconfig_with_context() {
        let source = CredentialSource::from_flags(
            Some(PathBuf::from("/etc/kube/config")),
            Some("prod".to_string()),
            false,
        )
        .unwrap();

        assert_eq!(
            source,
            CredentialSource::Kubeconfig {
                path: PathBuf::from("/etc/kube/config"),
                context: Some("prod".to_string()),
            }
        );
    }

    #[test]
    fn test_credential_source_rejects_conflicts() {
        assert!(CredentialSource::from_flags(Some(PathBuf::from("x")), None, true).is_err());
        assert!(CredentialSource::from_flags(None, Some("prod".to_string()), false).is_err());
    }

    #[test]
    fn test_serve_config_parses_listen_address() {
        let config = ServeConfig::new("127.0.0.1:9100", 5).unwrap();
        assert_eq!(config.listen.port(), 9100);
        assert_eq!(config.scrape_timeout, Duration::from_secs(5));

        assert!(ServeConfig::new("not-an-address", 5).is_err());
        assert!(ServeConfig::new(DEFAULT_LISTEN_ADDR, 0).is_err());
    }

    #[test]
    fn test_serve_config_default_matches_constants() {
        let config = ServeConfig::default();
        assert_eq!(config.listen, DEFAULT_LISTEN_ADDR.parse().unwrap());
        assert!(!config.log_samples);
    }

    #[test]
    fn test_serve_config_log_samples() {
        let config = ServeConfig::new(DEFAULT_LISTEN_ADDR, 5)
            .unwrap()
            .with_log_samples(true);
        assert!(config.log_samples);
    }
}

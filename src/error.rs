use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("Kubernetes error: {0}")]
    KubernetesError(String),

    #[error("Failed to load cluster credentials: {0}")]
    CredentialsError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid quantity {value:?}: {reason}")]
    InvalidQuantity { value: String, reason: String },

    #[error("Fetching pod metrics timed out after {0:?}")]
    FetchTimeout(Duration),

    #[error("Failed to bind {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Metrics error: {0}")]
    MetricsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<prometheus::Error> for UsageError {
    fn from(e: prometheus::Error) -> Self {
        UsageError::MetricsError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UsageError>;

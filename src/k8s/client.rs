use crate::config::CredentialSource;
use crate::k8s::types::PodMetrics;
use crate::{Result, UsageError};
use http::{header, HeaderValue};
use kube::client::ClientBuilder;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use tower_http::set_header::SetRequestHeaderLayer;
use tracing::{debug, info};

/// Identifies this exporter's requests in API server audit logs
pub const USER_AGENT: &str = "kube-usage-metrics";

pub struct K8sClient {
    client: Client,
}

impl K8sClient {
    pub async fn connect(source: &CredentialSource) -> Result<Self> {
        debug!("Initializing Kubernetes client from {:?}", source);

        let config = load_config(source).await?;
        let cluster_url = config.cluster_url.clone();

        let client = ClientBuilder::try_from(config)
            .map_err(|e| {
                UsageError::CredentialsError(format!("Failed to create K8s client: {}", e))
            })?
            .with_layer(&user_agent_layer())
            .build();

        info!("Using Kubernetes API server at {}", cluster_url);

        Ok(Self { client })
    }

    pub fn pod_metrics_all(&self) -> Api<PodMetrics> {
        Api::all(self.client.clone())
    }

    pub async fn list_pod_metrics(&self) -> Result<Vec<PodMetrics>> {
        let metrics = self
            .pod_metrics_all()
            .list(&Default::default())
            .await
            .map_err(|e| {
                UsageError::KubernetesError(format!("Failed to list pod metrics: {}", e))
            })?;

        debug!("Listed metrics for {} pods", metrics.items.len());

        Ok(metrics.items)
    }
}

/// Stamps every outgoing API request with [`USER_AGENT`]
pub fn user_agent_layer() -> SetRequestHeaderLayer<HeaderValue> {
    SetRequestHeaderLayer::overriding(header::USER_AGENT, HeaderValue::from_static(USER_AGENT))
}

pub async fn load_config(source: &CredentialSource) -> Result<Config> {
    match source {
        CredentialSource::Infer => Config::infer()
            .await
            .map_err(|e| UsageError::CredentialsError(e.to_string())),
        CredentialSource::InCluster => {
            Config::incluster().map_err(|e| UsageError::CredentialsError(e.to_string()))
        }
        CredentialSource::Kubeconfig { path, context } => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                UsageError::CredentialsError(format!("{}: {}", path.display(), e))
            })?;
            let options = KubeConfigOptions {
                context: context.clone(),
                ..Default::default()
            };

            Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| UsageError::CredentialsError(e.to_string()))
        }
    }
}

use crate::k8s::client::K8sClient;
use crate::k8s::types::UsageSample;
use crate::Result;
use async_trait::async_trait;
use tracing::debug;

/// Something that can report the current per-pod resource usage
///
/// Each call returns a fresh snapshot. A failure is a single error with no
/// partial results.
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<UsageSample>>;
}

#[async_trait]
impl UsageSource for K8sClient {
    async fn fetch(&self) -> Result<Vec<UsageSample>> {
        let pods = self.list_pod_metrics().await?;

        let samples = pods
            .iter()
            .filter_map(|pod| {
                let sample = UsageSample::from_pod_metrics(pod);
                if sample.is_none() {
                    debug!(
                        "Skipping pod metrics without namespace: {:?}",
                        pod.metadata.name
                    );
                }
                sample
            })
            .collect();

        Ok(samples)
    }
}

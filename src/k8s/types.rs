use crate::quantity::Quantity;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as RawQuantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// `PodMetrics` from the resource metrics API (`metrics.k8s.io/v1beta1`)
///
/// k8s-openapi does not ship the aggregated metrics API, so the resource is
/// declared here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodMetrics {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default)]
    pub containers: Vec<ContainerMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerMetrics {
    pub name: String,
    #[serde(default)]
    pub usage: BTreeMap<String, RawQuantity>,
}

impl k8s_openapi::Resource for PodMetrics {
    const API_VERSION: &'static str = "metrics.k8s.io/v1beta1";
    const GROUP: &'static str = "metrics.k8s.io";
    const KIND: &'static str = "PodMetrics";
    const VERSION: &'static str = "v1beta1";
    const URL_PATH_SEGMENT: &'static str = "pods";
    type Scope = k8s_openapi::NamespaceResourceScope;
}

impl k8s_openapi::Metadata for PodMetrics {
    type Ty = ObjectMeta;

    fn metadata(&self) -> &Self::Ty {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Self::Ty {
        &mut self.metadata
    }
}

/// One pod's usage at the time of a fetch
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSample {
    pub namespace: String,
    pub containers: Vec<ContainerReading>,
}

/// A container's reported usage. Missing readings count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContainerReading {
    pub cpu: Option<Quantity>,
    pub memory: Option<Quantity>,
}

impl ContainerReading {
    pub fn new(cpu: Quantity, memory: Quantity) -> Self {
        Self {
            cpu: Some(cpu),
            memory: Some(memory),
        }
    }
}

impl UsageSample {
    /// Convert a `PodMetrics` object into a sample.
    ///
    /// Returns `None` for objects without a namespace. Readings that fail to
    /// parse are logged and treated as absent.
    pub fn from_pod_metrics(pod: &PodMetrics) -> Option<Self> {
        let namespace = pod
            .metadata
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())?;
        let name = pod.metadata.name.as_deref().unwrap_or("unknown");

        let containers = pod
            .containers
            .iter()
            .map(|c| ContainerReading {
                cpu: reading(&c.usage, "cpu", namespace, name, &c.name),
                memory: reading(&c.usage, "memory", namespace, name, &c.name),
            })
            .collect();

        Some(Self {
            namespace: namespace.to_string(),
            containers,
        })
    }
}

fn reading(
    usage: &BTreeMap<String, RawQuantity>,
    resource: &str,
    namespace: &str,
    pod: &str,
    container: &str,
) -> Option<Quantity> {
    let raw = usage.get(resource)?;
    match Quantity::try_from(raw) {
        Ok(quantity) => Some(quantity),
        Err(e) => {
            warn!(
                "Ignoring {} usage of {}/{}/{}: {}",
                resource, namespace, pod, container, e
            );
            None
        }
    }
}

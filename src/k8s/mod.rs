pub mod client;
pub mod source;
pub mod types;

pub use client::K8sClient;
pub use source::UsageSource;
pub use types::{ContainerReading, PodMetrics, UsageSample};

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod k8s;
pub mod metrics;
pub mod quantity;
pub mod report;
pub mod server;

pub use aggregate::{aggregate, collect_namespace_usage, NamespaceTotal, NamespaceTotals};
pub use error::{Result, UsageError};
pub use quantity::Quantity;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

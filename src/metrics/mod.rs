pub mod collector;
pub mod exporter;
pub mod sink;

pub use collector::{emit_totals, NamespaceCollector};
pub use exporter::PrometheusSink;
pub use sink::{LogSink, MetricDesc, MetricSink};

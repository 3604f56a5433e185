use crate::metrics::sink::{MetricDesc, MetricSink};
use crate::Result;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use tracing::warn;

/// Sink that renders samples in the Prometheus text exposition format
///
/// Each scrape gets its own sink and registry, so nothing from a previous
/// scrape (such as a namespace that has since disappeared) leaks into the
/// next one.
pub struct PrometheusSink {
    registry: Registry,
    gauges: HashMap<&'static str, GaugeVec>,
}

impl PrometheusSink {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            gauges: HashMap::new(),
        }
    }

    fn gauge(&mut self, desc: &MetricDesc) -> Result<&GaugeVec> {
        if !self.gauges.contains_key(desc.name) {
            let gauge = GaugeVec::new(Opts::new(desc.name, desc.help), desc.labels)?;
            self.registry.register(Box::new(gauge.clone()))?;
            self.gauges.insert(desc.name, gauge);
        }

        Ok(&self.gauges[desc.name])
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        encoder.encode(&metric_families, &mut buffer)?;

        Ok(buffer)
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSink for PrometheusSink {
    fn emit(&mut self, desc: &MetricDesc, label_values: &[&str], value: f64) {
        let result = self.gauge(desc).and_then(|gauge| {
            gauge
                .get_metric_with_label_values(label_values)
                .map_err(Into::into)
        });

        match result {
            Ok(gauge) => gauge.set(value),
            Err(e) => warn!("Dropping {} sample: {}", desc.name, e),
        }
    }
}

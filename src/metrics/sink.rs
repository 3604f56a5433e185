use tracing::info;

/// Static description of an exposed metric family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

pub const NAMESPACE_CPU: MetricDesc = MetricDesc {
    name: "namespace_cpu",
    help: "CPU usage per namespace",
    labels: &["namespace"],
};

pub const NAMESPACE_MEMORY_BYTES: MetricDesc = MetricDesc {
    name: "namespace_memory_bytes",
    help: "Memory usage per namespace",
    labels: &["namespace"],
};

/// Destination for gauge samples produced by a scrape
///
/// `label_values` line up with `desc.labels`.
pub trait MetricSink {
    fn emit(&mut self, desc: &MetricDesc, label_values: &[&str], value: f64);
}

/// Writes every sample as a structured log event
#[derive(Debug, Default)]
pub struct LogSink {
    emitted: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl MetricSink for LogSink {
    fn emit(&mut self, desc: &MetricDesc, label_values: &[&str], value: f64) {
        let labels = desc
            .labels
            .iter()
            .zip(label_values)
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(",");

        info!(metric = desc.name, labels = %labels, value, "gauge sample");
        self.emitted += 1;
    }
}

/// Collects samples in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub samples: Vec<(&'static str, Vec<String>, f64)>,
}

#[cfg(test)]
impl MetricSink for RecordingSink {
    fn emit(&mut self, desc: &MetricDesc, label_values: &[&str], value: f64) {
        self.samples.push((
            desc.name,
            label_values.iter().map(|v| v.to_string()).collect(),
            value,
        ));
    }
}

use crate::aggregate::{collect_namespace_usage, NamespaceTotals};
use crate::k8s::UsageSource;
use crate::metrics::sink::{LogSink, MetricSink, NAMESPACE_CPU, NAMESPACE_MEMORY_BYTES};
use crate::{Result, UsageError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, Dispatch};

/// Recomputes namespace usage on every scrape
///
/// Nothing is cached between scrapes. The fetch runs inside the scrape's own
/// future under a deadline, so it is dropped as soon as the scrape finishes,
/// times out, or the caller goes away.
#[derive(Clone)]
pub struct NamespaceCollector {
    source: Arc<dyn UsageSource>,
    scrape_timeout: Duration,
    dispatch: Dispatch,
    log_samples: bool,
}

impl NamespaceCollector {
    /// Create a collector that logs through the current default subscriber
    pub fn new(source: Arc<dyn UsageSource>, scrape_timeout: Duration) -> Self {
        Self {
            source,
            scrape_timeout,
            dispatch: tracing::dispatcher::get_default(|d| d.clone()),
            log_samples: false,
        }
    }

    /// Route this collector's logs to `dispatch`
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Also write every emitted sample to the log
    pub fn with_sample_log(mut self, enabled: bool) -> Self {
        self.log_samples = enabled;
        self
    }

    fn log<T, F: FnOnce() -> T>(&self, f: F) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Fetch and aggregate one snapshot, bounded by the scrape deadline
    pub async fn scrape(&self) -> Result<NamespaceTotals> {
        tokio::time::timeout(
            self.scrape_timeout,
            collect_namespace_usage(self.source.as_ref()),
        )
        .await
        .map_err(|_| UsageError::FetchTimeout(self.scrape_timeout))?
    }

    /// Run one scrape and emit two gauges per namespace into `sink`.
    ///
    /// A failed fetch is logged and produces no samples. Returns the number of
    /// samples emitted.
    pub async fn collect<S: MetricSink + Send>(&self, sink: &mut S) -> usize {
        let totals = match self.scrape().await {
            Ok(totals) => totals,
            Err(e) => {
                self.log(|| error!("Failed to collect namespace usage: {}", e));
                return 0;
            }
        };

        let emitted = emit_totals(&totals, sink);
        if self.log_samples {
            self.log(|| emit_totals(&totals, &mut LogSink::new()));
        }
        self.log(|| {
            debug!(
                "Scrape emitted {} samples for {} namespaces",
                emitted,
                totals.len()
            )
        });

        emitted
    }
}

/// Emit `namespace_cpu` and `namespace_memory_bytes` for every namespace
pub fn emit_totals<S: MetricSink + ?Sized>(totals: &NamespaceTotals, sink: &mut S) -> usize {
    let mut emitted = 0;

    for (namespace, total) in totals {
        sink.emit(&NAMESPACE_CPU, &[namespace.as_str()], total.cpu.as_approximate_f64());
        sink.emit(
            &NAMESPACE_MEMORY_BYTES,
            &[namespace.as_str()],
            total.memory.as_approximate_f64(),
        );
        emitted += 2;
    }

    emitted
}

//! Namespace aggregator folding pod usage samples into per-namespace totals

use crate::k8s::{UsageSample, UsageSource};
use crate::quantity::Quantity;
use crate::Result;
use std::collections::BTreeMap;

/// Summed usage of every container in one namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamespaceTotal {
    pub cpu: Quantity,
    pub memory: Quantity,
}

impl NamespaceTotal {
    pub const ZERO: NamespaceTotal = NamespaceTotal {
        cpu: Quantity::ZERO,
        memory: Quantity::ZERO,
    };
}

/// Totals keyed by namespace name
pub type NamespaceTotals = BTreeMap<String, NamespaceTotal>;

/// Sum cpu and memory per namespace across all pods and containers
pub fn aggregate(samples: &[UsageSample]) -> NamespaceTotals {
    let mut totals = NamespaceTotals::new();

    for sample in samples {
        let total = totals
            .entry(sample.namespace.clone())
            .or_insert(NamespaceTotal::ZERO);

        for container in &sample.containers {
            if let Some(cpu) = &container.cpu {
                total.cpu.add(cpu);
            }
            if let Some(memory) = &container.memory {
                total.memory.add(memory);
            }
        }
    }

    totals
}

/// Fetch a fresh snapshot from `source` and aggregate it
pub async fn collect_namespace_usage(source: &dyn UsageSource) -> Result<NamespaceTotals> {
    let samples = source.fetch().await?;
    Ok(aggregate(&samples))
}

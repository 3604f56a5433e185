//! Human-readable one-shot report of namespace usage

use crate::aggregate::NamespaceTotals;

const NAMESPACE_HEADER: &str = "NAMESPACE";

/// Render totals as a table, one namespace per row, sorted by name
pub fn render(totals: &NamespaceTotals) -> String {
    if totals.is_empty() {
        return "No pod metrics found.\n".to_string();
    }

    let width = totals
        .keys()
        .map(|ns| ns.len())
        .chain(std::iter::once(NAMESPACE_HEADER.len()))
        .max()
        .unwrap_or(NAMESPACE_HEADER.len());

    let row = |namespace: &str, cpu: &str, memory: &str| {
        format!("{:<width$}  {:>12}  {:>12}\n", namespace, cpu, memory, width = width)
    };

    let mut out = row(NAMESPACE_HEADER, "CPU", "MEMORY");
    out.push_str(&"-".repeat(width + 28));
    out.push('\n');

    for (namespace, total) in totals {
        out.push_str(&row(
            namespace,
            &total.cpu.to_string(),
            &total.memory.to_string(),
        ));
    }

    out
}

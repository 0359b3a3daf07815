use crate::layout::RuleTrace;
use crate::value::DisplayValue;
use itertools::Itertools;

/// Formats visibility traces into human-readable explanations
pub struct TraceFormatter;

impl TraceFormatter {
    /// One line per node, e.g. `field:headline: $type (was "format") in ["medium"] -> SHOW: hidden`.
    pub fn format_trace(trace: &RuleTrace) -> String {
        let verdict = if trace.shown() { "shown" } else { "hidden" };
        let reason = match &trace.rule {
            None => "always".to_string(),
            Some(rule) => format!(
                "${} (was {}) in [{}] -> {}",
                rule.depends_on_field,
                DisplayValue(&trace.observed),
                rule.match_if.iter().map(|v| DisplayValue(v).to_string()).join(", "),
                rule.effect
            ),
        };

        match &trace.suppressed_by {
            Some(ancestor) => format!(
                "{}: {}: {} (inside hidden {})",
                trace.node, reason, verdict, ancestor
            ),
            None => format!("{}: {}: {}", trace.node, reason, verdict),
        }
    }

    /// Formats every trace, one per line.
    pub fn format_all(traces: &[RuleTrace]) -> String {
        traces.iter().map(Self::format_trace).join("\n")
    }
}

//! Per-phase counters, emitted as tracing events.
//!
//! Nothing is aggregated in-process; point a subscriber at target
//! `relmr::metrics` to collect them.

pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::span!(tracing::Level::TRACE, "relmr", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(target: "relmr::metrics", %event, %k, %v, "metric");
    }
}

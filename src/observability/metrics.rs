//! Router metrics.
//!
//! # Metrics
//! - `router_navigations_total` (counter): resolutions by mode, outcome
//! - `router_transition_duration_seconds` (histogram): time from read to mount
//! - `router_unmount_failures_total` (counter): host unmount errors swallowed

use std::time::Duration;

/// Record one completed route resolution.
pub fn record_navigation(mode: &'static str, outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!(
        "router_navigations_total",
        "mode" => mode,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("router_transition_duration_seconds", "mode" => mode)
        .record(elapsed.as_secs_f64());
}

pub fn record_unmount_failure() {
    ::metrics::counter!("router_unmount_failures_total").increment(1);
}

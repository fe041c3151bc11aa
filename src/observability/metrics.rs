//! Metrics collection for `flagpole`.
//!
//! Prometheus-compatible counters and gauges with typed convenience
//! functions. Recording is a no-op until [`init_metrics`] installs a
//! recorder, so library users who never call it pay nothing.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::FlagpoleError;
use crate::lifecycle::EventPhase;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
///
/// Returns `FlagpoleError::Io` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), FlagpoleError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| FlagpoleError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "flagpole_phase_transitions_total",
        "Total number of event lifecycle transitions"
    );
    describe_gauge!(
        "flagpole_current_phase",
        "Current lifecycle phase (0 upcoming, 1 live, 2 finished)"
    );
    describe_counter!(
        "flagpole_teaser_attempts_total",
        "Teaser answers submitted, by outcome"
    );
    describe_counter!(
        "flagpole_registrations_total",
        "Registration submissions, by outcome"
    );
    describe_counter!(
        "flagpole_content_fallbacks_total",
        "Content loads that fell back to the embedded document"
    );
}

/// Records a lifecycle transition.
pub fn record_phase_transition(to: EventPhase) {
    counter!("flagpole_phase_transitions_total", "to" => to.as_str()).increment(1);
    gauge!("flagpole_current_phase").set(f64::from(to.ordinal()));
}

/// Records a teaser attempt.
pub fn record_teaser_attempt(correct: bool) {
    let outcome = if correct { "correct" } else { "incorrect" };
    counter!("flagpole_teaser_attempts_total", "outcome" => outcome).increment(1);
}

/// Records the outcome of a registration submission.
pub fn record_registration(outcome: &'static str) {
    counter!("flagpole_registrations_total", "outcome" => outcome).increment(1);
}

/// Records a content fallback.
pub fn record_content_fallback() {
    counter!("flagpole_content_fallbacks_total").increment(1);
}

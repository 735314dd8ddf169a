//! Prometheus metrics for notifier observability.

use metrics::counter;

/// Initialize metrics exporter (Prometheus).
pub fn init_metrics() {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record a webhook that made it past validation.
pub fn webhook_received(phase: &str) {
    counter!("notifier_webhooks_received_total", "phase" => phase.to_string()).increment(1);
}

/// Record a rejected webhook request.
pub fn request_rejected(kind: &str) {
    counter!("notifier_requests_rejected_total", "kind" => kind.to_string()).increment(1);
}

/// Record an event that matched no notification rule.
pub fn message_suppressed(phase: &str) {
    counter!("notifier_messages_suppressed_total", "phase" => phase.to_string()).increment(1);
}

/// Record a message handed to the dispatcher.
pub fn message_sent() {
    counter!("notifier_messages_sent_total").increment(1);
}

/// Record a dispatcher error.
pub fn dispatch_failed() {
    counter!("notifier_dispatch_failures_total").increment(1);
}

/// Record an administrative status reset.
pub fn status_reset() {
    counter!("notifier_status_resets_total").increment(1);
}

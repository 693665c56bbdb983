//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Agent operation metrics
    pub agent_requests: CounterVec,
    pub agent_request_duration: HistogramVec,

    // Model dispatch metrics
    pub dispatch_requests: CounterVec,
    pub dispatch_duration: HistogramVec,
    pub dispatch_fallbacks: Counter,

    // Context retrieval metrics
    pub context_retrievals: Counter,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let agent_requests = register_counter_vec_with_registry!(
            Opts::new("agent_requests_total", "Total organizer agent requests"),
            &["operation", "status"],
            registry
        )?;

        let agent_request_duration = register_histogram_vec_with_registry!(
            "agent_request_duration_seconds",
            "Organizer agent request duration in seconds",
            &["operation"],
            registry
        )?;

        let dispatch_requests = register_counter_vec_with_registry!(
            Opts::new("dispatch_requests_total", "Total model dispatch attempts"),
            &["provider", "status"],
            registry
        )?;

        let dispatch_duration = register_histogram_vec_with_registry!(
            "dispatch_duration_seconds",
            "Model dispatch duration in seconds",
            &["provider"],
            registry
        )?;

        let dispatch_fallbacks = register_counter_with_registry!(
            Opts::new(
                "dispatch_fallbacks_total",
                "Total dispatch failures converted to the chat fallback string"
            ),
            registry
        )?;

        let context_retrievals = register_counter_with_registry!(
            Opts::new("context_retrievals_total", "Total context retrievals"),
            registry
        )?;

        Ok(Self {
            registry,
            agent_requests,
            agent_request_duration,
            dispatch_requests,
            dispatch_duration,
            dispatch_fallbacks,
            context_retrievals,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record an agent operation outcome
    pub fn record_agent_request(&self, operation: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.agent_requests
            .with_label_values(&[operation, status])
            .inc();
    }

    /// Record a model dispatch outcome
    pub fn record_dispatch(&self, provider: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.dispatch_requests
            .with_label_values(&[provider, status])
            .inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}

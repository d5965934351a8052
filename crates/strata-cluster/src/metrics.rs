//! Prometheus instrumentation for administrative operations.
//!
//! Attached to a [`ClusterHandle`](crate::ClusterHandle) when the metrics
//! profile is enabled in [`ClusterConfig`](crate::ClusterConfig); a pure
//! side effect with no behavioral branching anywhere else.

use std::sync::OnceLock;
use std::time::Instant;

use prometheus::{Counter, CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};

/// Global metrics registry.
static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Administrative operation metrics.
pub struct Metrics {
    /// Registry for all metrics.
    registry: Registry,

    /// Total schema operations by operation and status.
    pub ops_total: CounterVec,
    /// Operation duration histogram by operation.
    pub op_duration_seconds: HistogramVec,
    /// Total administrative connections opened.
    pub connections_opened: Counter,
}

impl Metrics {
    fn new() -> Self {
        let registry = Registry::new();

        let ops_total = CounterVec::new(
            Opts::new("strata_admin_ops_total", "Total schema operations"),
            &["op", "status"],
        )
        .expect("valid metric");

        let op_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "strata_admin_op_duration_seconds",
                "Schema operation duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]),
            &["op"],
        )
        .expect("valid metric");

        let connections_opened = Counter::new(
            "strata_admin_connections_opened_total",
            "Total administrative connections opened",
        )
        .expect("valid metric");

        registry
            .register(Box::new(ops_total.clone()))
            .expect("register metric");
        registry
            .register(Box::new(op_duration_seconds.clone()))
            .expect("register metric");
        registry
            .register(Box::new(connections_opened.clone()))
            .expect("register metric");

        Self {
            registry,
            ops_total,
            op_duration_seconds,
            connections_opened,
        }
    }

    /// Returns the global metrics instance.
    pub fn global() -> &'static Metrics {
        METRICS.get_or_init(Metrics::new)
    }

    /// Renders metrics in Prometheus text format, for embedding in a host
    /// application's exposition endpoint.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_else(|e| format!("# Error encoding metrics: {e}\n"))
    }
}

/// A guard that records operation duration when dropped.
pub struct OpTimer {
    op: &'static str,
    start: Instant,
}

impl OpTimer {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }
}

impl Drop for OpTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        Metrics::global()
            .op_duration_seconds
            .with_label_values(&[self.op])
            .observe(duration);
    }
}

/// Records a completed schema operation.
pub fn record_op(op: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    Metrics::global()
        .ops_total
        .with_label_values(&[op, status])
        .inc();
}

/// Records a newly opened administrative connection.
pub fn record_connection_opened() {
    Metrics::global().connections_opened.inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_render_contains_ops() {
        record_op("describe_keyspace", true);
        assert!(Metrics::global().render().contains("strata_admin_ops_total"));
    }

    #[test]
    fn op_timer_records_on_drop() {
        {
            let _timer = OpTimer::new("add_keyspace");
        }
        let rendered = Metrics::global().render();
        assert!(rendered.contains("strata_admin_op_duration_seconds"));
    }
}

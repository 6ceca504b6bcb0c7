//! Observability helpers: Prometheus metrics (feature `metrics`) and tracing
//! spans (feature `tracing`).

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use opentelemetry::{
    global,
    metrics::{Counter, Histogram},
};
#[cfg(feature = "metrics")]
use opentelemetry_prometheus::PrometheusExporter;

#[cfg(feature = "metrics")]
pub static METRICS: Lazy<CanopyMetrics> = Lazy::new(CanopyMetrics::init);

#[cfg(feature = "metrics")]
pub struct CanopyMetrics {
    pub exporter: PrometheusExporter,
    pub queries_total: Counter<u64>,
    pub query_errors_total: Counter<u64>,
    pub query_duration: Histogram<f64>,
    pub connection_wait_duration: Histogram<f64>,
}

#[cfg(feature = "metrics")]
impl CanopyMetrics {
    pub fn init() -> Self {
        let exporter = opentelemetry_prometheus::exporter()
            .build()
            .expect("failed to build prometheus exporter");
        let meter = global::meter("canopy");

        let queries_total = meter
            .u64_counter("canopy_queries_total")
            .with_description("Total queries executed")
            .build();

        let query_errors_total = meter
            .u64_counter("canopy_query_errors_total")
            .with_description("Total queries that returned an error")
            .build();

        let query_duration = meter
            .f64_histogram("canopy_query_duration_seconds")
            .with_description("Duration of queries")
            .build();

        let connection_wait_duration = meter
            .f64_histogram("canopy_connection_wait_seconds")
            .with_description("Time spent establishing database connections")
            .build();

        Self {
            exporter,
            queries_total,
            query_errors_total,
            query_duration,
            connection_wait_duration,
        }
    }

    pub fn record_query_duration(&self, elapsed: std::time::Duration) {
        self.queries_total.add(1, &[]);
        self.query_duration.record(elapsed.as_secs_f64(), &[]);
    }

    pub fn record_query_error(&self) {
        self.query_errors_total.add(1, &[]);
    }

    pub fn record_connection_wait(&self, duration: std::time::Duration) {
        self.connection_wait_duration
            .record(duration.as_secs_f64(), &[]);
    }
}

/// Span constructors used by the executor, transaction, and connection paths.
#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::Span;

    pub fn execute_query_span(query: &str) -> Span {
        tracing::debug_span!("db_query", query = %query)
    }

    pub fn begin_transaction_span() -> Span {
        tracing::debug_span!("db_transaction_begin")
    }

    pub fn commit_transaction_span() -> Span {
        tracing::debug_span!("db_transaction_commit")
    }

    pub fn rollback_transaction_span() -> Span {
        tracing::debug_span!("db_transaction_rollback")
    }

    pub fn acquire_connection_span() -> Span {
        tracing::debug_span!("db_connect")
    }
}

#[cfg(all(test, feature = "tracing"))]
mod tests {
    use super::tracing_helpers;

    #[test]
    fn test_spans_construct_without_subscriber() {
        // Spans must be constructible even when no subscriber is installed.
        let _ = tracing_helpers::execute_query_span("SELECT 1").entered();
        let _ = tracing_helpers::begin_transaction_span();
        let _ = tracing_helpers::commit_transaction_span();
        let _ = tracing_helpers::rollback_transaction_span();
        let _ = tracing_helpers::acquire_connection_span();
    }
}

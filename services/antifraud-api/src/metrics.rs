use lazy_static::lazy_static;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use risk_engine::{RiskScore, RiskStatus};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Business metrics - scoring
    pub static ref TRANSACTIONS_EVALUATED: IntCounterVec = IntCounterVec::new(
        Opts::new("transactions_evaluated_total", "Transactions scored on ingestion"),
        &["status"]
    ).expect("metric can be created");

    pub static ref RISK_SCORE: Histogram = Histogram::with_opts(
        HistogramOpts::new("risk_score", "Distribution of assigned risk scores")
            .buckets(vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0])
    ).expect("metric can be created");

    pub static ref EXPLANATIONS_SERVED: IntCounter = IntCounter::new(
        "explanations_served_total",
        "Score explanations returned"
    ).expect("metric can be created");

    pub static ref VALIDATION_FAILURES: IntCounter = IntCounter::new(
        "validation_failures_total",
        "Ingestion requests rejected by validation"
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(TRANSACTIONS_EVALUATED.clone()))?;
    registry.register(Box::new(RISK_SCORE.clone()))?;
    registry.register(Box::new(EXPLANATIONS_SERVED.clone()))?;
    registry.register(Box::new(VALIDATION_FAILURES.clone()))?;
    Ok(())
}

pub fn record_evaluation(score: RiskScore, status: RiskStatus) {
    TRANSACTIONS_EVALUATED
        .with_label_values(&[status.label()])
        .inc();
    RISK_SCORE.observe(score.as_f64());
}

/// Generate metrics output in Prometheus text format
pub fn metrics_handler() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

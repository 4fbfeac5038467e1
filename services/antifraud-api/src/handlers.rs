use crate::errors::{ApiError, ApiResult};
use crate::metrics;
use crate::models::*;
use crate::service::TransactionService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

// ===== Health Check =====
pub async fn health_check(service: web::Data<Arc<TransactionService>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        transactions: service.transaction_count(),
    })
}

// ===== Prometheus Scrape =====
pub async fn prometheus_metrics() -> ApiResult<HttpResponse> {
    let body = metrics::metrics_handler().map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

// ===== Service Banner =====
pub async fn status() -> HttpResponse {
    HttpResponse::Ok().body("Antifraud transaction scoring operational")
}

// ===== Ingest Transaction =====
pub async fn create_transaction(
    req: web::Json<CreateTransactionRequest>,
    service: web::Data<Arc<TransactionService>>,
) -> ApiResult<HttpResponse> {
    let transaction = service.register(req.into_inner())?;
    Ok(HttpResponse::Created().json(transaction))
}

// ===== List Transactions =====
pub async fn list_transactions(service: web::Data<Arc<TransactionService>>) -> HttpResponse {
    HttpResponse::Ok().json(service.list())
}

// ===== Aggregate Statistics =====
pub async fn get_statistics(service: web::Data<Arc<TransactionService>>) -> HttpResponse {
    HttpResponse::Ok().json(service.statistics())
}

// ===== Explain Decision =====
pub async fn explain_transaction(
    path: web::Path<Uuid>,
    service: web::Data<Arc<TransactionService>>,
) -> ApiResult<HttpResponse> {
    let explanation = service.explain(path.into_inner())?;
    Ok(HttpResponse::Ok().json(explanation))
}

// ===== Dry-run Evaluation =====
pub async fn evaluate_risk(
    req: web::Json<EvaluateRequest>,
    service: web::Data<Arc<TransactionService>>,
) -> HttpResponse {
    HttpResponse::Ok().json(service.evaluate(&req))
}

/// JSON extractor config that reports body errors in the service's error envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| ApiError::MalformedRequest(err.to_string()).into())
}

/// Path extractor config that turns a malformed id into a 404
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| ApiError::NotFound(err.to_string()).into())
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/transactions")
                        .route("", web::post().to(create_transaction))
                        .route("", web::get().to(list_transactions))
                        .route("/status", web::get().to(status))
                        .route("/statistics", web::get().to(get_statistics))
                        .route("/{id}/explanation", web::get().to(explain_transaction)),
                )
                .route("/risk/evaluate", web::post().to(evaluate_risk)),
        )
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(prometheus_metrics));
}

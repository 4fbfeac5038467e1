use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use antifraud_api::{
    config::Config, handlers, metrics, middleware::RateLimiter, InMemoryStore, TransactionService,
};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;
    config.validate().map_err(anyhow::Error::msg)?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting Antifraud API...");

    metrics::register_metrics(&metrics::REGISTRY)?;

    // Initialize components
    let service = Arc::new(TransactionService::new(Arc::new(InMemoryStore::new())));
    let rate_limiter = RateLimiter::new(config.rate_limit.requests_per_minute);

    let server_config = config.server.clone();

    info!(
        "Starting HTTP server on {}:{} ({} workers, {} req/min)",
        server_config.host,
        server_config.port,
        server_config.workers,
        config.rate_limit.requests_per_minute
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .wrap(rate_limiter.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))?
    .run()
    .await?;

    info!("Antifraud API stopped");
    Ok(())
}

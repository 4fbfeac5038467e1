pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use service::TransactionService;
pub use store::{InMemoryStore, TransactionStore};

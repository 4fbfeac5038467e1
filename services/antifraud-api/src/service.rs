use crate::errors::{ApiError, ApiResult};
use crate::metrics;
use crate::models::{
    CreateTransactionRequest, EvaluateRequest, ExplanationResponse, NewTransaction, Transaction,
    TransactionStatistics,
};
use crate::store::TransactionStore;
use chrono::{Local, NaiveDateTime};
use risk_engine::{Channel, RiskScorer, ScoreResult, TransactionSnapshot};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Source of "now" for transactions submitted without a timestamp
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
    scorer: RiskScorer,
    clock: Clock,
}

impl TransactionService {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self::with_clock(store, Arc::new(|| Local::now().naive_local()))
    }

    pub fn with_clock(store: Arc<dyn TransactionStore>, clock: Clock) -> Self {
        TransactionService {
            store,
            scorer: RiskScorer::new(),
            clock,
        }
    }

    /// Validate, score and persist an incoming transaction
    pub fn register(&self, request: CreateTransactionRequest) -> ApiResult<Transaction> {
        if let Err(errors) = request.validate() {
            metrics::VALIDATION_FAILURES.inc();
            let err = ApiError::from(errors);
            warn!("Rejected transaction: {}", err);
            return Err(err);
        }

        // validate() guarantees these are present
        let (Some(user_id), Some(amount), Some(label)) =
            (request.user_id, request.amount, request.channel)
        else {
            return Err(ApiError::Internal("validated request missing fields".to_string()));
        };
        let channel: Channel = label.parse()?;
        let timestamp = request.timestamp.unwrap_or_else(|| (self.clock)());

        let result = self
            .scorer
            .evaluate(&TransactionSnapshot::new(amount, timestamp, channel));

        let saved = self.store.insert(NewTransaction {
            user_id,
            amount,
            channel,
            timestamp,
            score: result.score,
            status: result.status,
        });

        metrics::record_evaluation(saved.score, saved.status);
        info!(
            transaction_id = %saved.id,
            score = saved.score.points(),
            status = %saved.status,
            "Transaction registered"
        );

        Ok(saved)
    }

    pub fn list(&self) -> Vec<Transaction> {
        self.store.list()
    }

    pub fn get(&self, id: Uuid) -> ApiResult<Transaction> {
        self.store
            .get(id)
            .ok_or_else(|| ApiError::NotFound(format!("transaction {}", id)))
    }

    /// Recompute the score composition of a stored transaction
    pub fn explain(&self, id: Uuid) -> ApiResult<ExplanationResponse> {
        let transaction = self.get(id)?;
        let explanation = self.scorer.explain(&transaction.snapshot());
        metrics::EXPLANATIONS_SERVED.inc();

        Ok(ExplanationResponse::new(&transaction, explanation))
    }

    pub fn statistics(&self) -> TransactionStatistics {
        TransactionStatistics::from_transactions(&self.store.list())
    }

    /// Score without persisting
    pub fn evaluate(&self, request: &EvaluateRequest) -> ScoreResult {
        self.scorer.evaluate(&request.snapshot())
    }

    pub fn transaction_count(&self) -> usize {
        self.store.len()
    }
}

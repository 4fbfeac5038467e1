use chrono::{DateTime, NaiveDateTime, Utc};
use risk_engine::{
    Channel, Explanation, FactorContribution, RiskScore, RiskStatus, TransactionSnapshot,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Largest amount accepted on ingestion
pub const MAX_TRANSACTION_AMOUNT: u32 = 1_000_000;

// ===== Transaction Record =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub amount: Decimal,
    pub channel: Channel,
    pub timestamp: NaiveDateTime,
    pub score: RiskScore,
    pub status: RiskStatus,
}

impl Transaction {
    /// Scoring view of the stored fields
    pub fn snapshot(&self) -> TransactionSnapshot {
        TransactionSnapshot::new(self.amount, self.timestamp, self.channel)
    }
}

/// A validated transaction that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: String,
    pub amount: Decimal,
    pub channel: Channel,
    pub timestamp: NaiveDateTime,
    pub score: RiskScore,
    pub status: RiskStatus,
}

// ===== Ingestion Request =====
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct CreateTransactionRequest {
    #[validate(
        required(message = "user_id is required"),
        length(min = 3, max = 50, message = "user_id must be between 3 and 50 characters"),
        custom = "validate_not_blank"
    )]
    pub user_id: Option<String>,

    #[validate(
        required(message = "amount is required"),
        custom = "validate_amount"
    )]
    pub amount: Option<Decimal>,

    #[validate(
        required(message = "channel is required"),
        custom = "validate_channel"
    )]
    pub channel: Option<String>,

    /// Assigned by the service when absent
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("user_id must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("amount must be positive".into());
        return Err(err);
    }
    if *amount > Decimal::from(MAX_TRANSACTION_AMOUNT) {
        let mut err = ValidationError::new("max");
        err.message = Some("amount must not exceed 1000000".into());
        return Err(err);
    }
    Ok(())
}

fn validate_channel(channel: &str) -> Result<(), ValidationError> {
    if channel.parse::<Channel>().is_err() {
        let mut err = ValidationError::new("channel");
        err.message = Some("channel must be one of: PIX, TED, DOC, BOLETO, CARD".into());
        return Err(err);
    }
    Ok(())
}

// ===== Dry-run Evaluation Request =====
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub channel: Option<String>,
}

impl EvaluateRequest {
    pub fn snapshot(&self) -> TransactionSnapshot {
        TransactionSnapshot {
            amount: self.amount,
            timestamp: self.timestamp,
            channel: self
                .channel
                .as_deref()
                .map(Channel::from_label)
                .unwrap_or_default(),
        }
    }
}

// ===== Explanation =====
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExplanationResponse {
    pub id: Uuid,
    pub status: RiskStatus,
    pub score: RiskScore,
    pub factors: Vec<FactorContribution>,
    pub summary: String,
}

impl ExplanationResponse {
    pub fn new(transaction: &Transaction, explanation: Explanation) -> Self {
        ExplanationResponse {
            id: transaction.id,
            status: transaction.status,
            score: transaction.score,
            summary: explanation.to_string(),
            factors: explanation.factors,
        }
    }
}

// ===== Statistics =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TransactionStatistics {
    pub total: u64,
    pub approved: u64,
    pub in_review: u64,
    pub blocked: u64,
    pub total_amount: Decimal,
    pub blocked_amount: Decimal,
    /// Mean score, one decimal place
    pub average_score: f64,
    /// Blocked share in percent, one decimal place
    pub block_rate: f64,
}

impl TransactionStatistics {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut stats = TransactionStatistics::default();
        let mut score_sum = 0u64;

        for tx in transactions {
            stats.total += 1;
            stats.total_amount += tx.amount;
            score_sum += u64::from(tx.score.points());
            match tx.status {
                RiskStatus::Approved => stats.approved += 1,
                RiskStatus::Review => stats.in_review += 1,
                RiskStatus::Blocked => {
                    stats.blocked += 1;
                    stats.blocked_amount += tx.amount;
                }
            }
        }

        stats.total_amount = stats.total_amount.round_dp(2);
        stats.blocked_amount = stats.blocked_amount.round_dp(2);

        if stats.total > 0 {
            stats.average_score = round1(score_sum as f64 / stats.total as f64);
            stats.block_rate = round1(stats.blocked as f64 * 100.0 / stats.total as f64);
        }

        stats
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ===== Health Check =====
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub transactions: usize,
}

// ===== Error Response =====
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn request(user_id: &str, amount: Decimal, channel: &str) -> CreateTransactionRequest {
        CreateTransactionRequest {
            user_id: Some(user_id.to_string()),
            amount: Some(amount),
            channel: Some(channel.to_string()),
            timestamp: None,
        }
    }

    fn record(amount: Decimal, score: u32) -> Transaction {
        let score = RiskScore::new(score);
        Transaction {
            id: Uuid::now_v7(),
            user_id: "user-1".to_string(),
            amount,
            channel: Channel::Pix,
            timestamp: NaiveDate::from_ymd_opt(2026, 1, 13)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            score,
            status: RiskStatus::from(score),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("user-1", dec!(250.50), "pix").validate().is_ok());
        assert!(request("abc", dec!(1000000), "CARTAO").validate().is_ok());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let req = CreateTransactionRequest {
            user_id: None,
            amount: None,
            channel: None,
            timestamp: None,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("user_id"));
        assert!(fields.contains_key("amount"));
        assert!(fields.contains_key("channel"));
    }

    #[test]
    fn test_field_rules() {
        assert!(request("ab", dec!(10), "PIX").validate().is_err());
        assert!(request("   ", dec!(10), "PIX").validate().is_err());
        assert!(request(&"x".repeat(51), dec!(10), "PIX").validate().is_err());
        assert!(request("user-1", dec!(0), "PIX").validate().is_err());
        assert!(request("user-1", dec!(-1), "PIX").validate().is_err());
        assert!(request("user-1", dec!(1000000.01), "PIX").validate().is_err());
        assert!(request("user-1", dec!(10), "WIRE").validate().is_err());
    }

    #[test]
    fn test_evaluate_request_snapshot_is_lenient() {
        let req = EvaluateRequest {
            amount: None,
            timestamp: None,
            channel: Some("bitcoin".to_string()),
        };
        let snapshot = req.snapshot();
        assert_eq!(snapshot.channel, Channel::Unrecognized);
        assert!(snapshot.amount.is_none());
    }

    #[test]
    fn test_statistics_empty() {
        let stats = TransactionStatistics::from_transactions(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.block_rate, 0.0);
    }

    #[test]
    fn test_statistics_counts_and_amounts() {
        let txs = vec![
            record(dec!(20000), 75),
            record(dec!(8000), 45),
            record(dec!(300), 5),
        ];
        let stats = TransactionStatistics::from_transactions(&txs);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.in_review, 1);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.total_amount, dec!(28300));
        assert_eq!(stats.blocked_amount, dec!(20000));
        assert_eq!(stats.average_score, 41.7);
        assert_eq!(stats.block_rate, 33.3);
    }
}

//! Core types for risk engine

use crate::{Error, Result};
use chrono::{NaiveDateTime, Timelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound of the total risk score
pub const MAX_SCORE: u8 = 100;

/// Score at or above which a transaction is blocked
pub const BLOCK_THRESHOLD: u8 = 70;

/// Score at or above which a transaction goes to manual review
pub const REVIEW_THRESHOLD: u8 = 40;

/// Payment rail a transaction was submitted through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Instant payment
    Pix,
    /// Same-day wire transfer
    Ted,
    /// Next-day wire transfer
    Doc,
    /// Bank slip
    Boleto,
    /// Card payment
    #[serde(alias = "CARTAO")]
    Card,
    /// Label outside the supported set, or no label at all
    #[default]
    Unrecognized,
}

impl Channel {
    /// Every supported rail, in scoring-table order
    pub const SUPPORTED: [Channel; 5] = [
        Channel::Pix,
        Channel::Ted,
        Channel::Card,
        Channel::Doc,
        Channel::Boleto,
    ];

    /// Lenient, case-insensitive parse. Never fails; anything outside the
    /// closed set maps to [`Channel::Unrecognized`].
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_uppercase().as_str() {
            "PIX" => Channel::Pix,
            "TED" => Channel::Ted,
            "DOC" => Channel::Doc,
            "BOLETO" => Channel::Boleto,
            "CARD" | "CARTAO" => Channel::Card,
            _ => Channel::Unrecognized,
        }
    }

    /// Canonical upper-case label
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Pix => "PIX",
            Channel::Ted => "TED",
            Channel::Doc => "DOC",
            Channel::Boleto => "BOLETO",
            Channel::Card => "CARD",
            Channel::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Whether the channel is one of the supported rails
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Channel::Unrecognized)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match Channel::from_label(s) {
            Channel::Unrecognized => Err(Error::UnknownChannel(s.to_string())),
            channel => Ok(channel),
        }
    }
}

/// Risk score (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Create new risk score, clamped to [`MAX_SCORE`]
    pub fn new(points: u32) -> Self {
        Self(points.min(MAX_SCORE as u32) as u8)
    }

    /// Get raw score
    pub fn points(&self) -> u8 {
        self.0
    }

    /// Score as a real number in [0, 100]
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decision outcome derived solely from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    /// Score below [`REVIEW_THRESHOLD`]
    Approved,
    /// Score in [`REVIEW_THRESHOLD`, `BLOCK_THRESHOLD`)
    Review,
    /// Score at or above [`BLOCK_THRESHOLD`]
    Blocked,
}

impl RiskStatus {
    /// Canonical upper-case label
    pub fn label(&self) -> &'static str {
        match self {
            RiskStatus::Approved => "APPROVED",
            RiskStatus::Review => "REVIEW",
            RiskStatus::Blocked => "BLOCKED",
        }
    }
}

impl From<RiskScore> for RiskStatus {
    fn from(score: RiskScore) -> Self {
        if score.points() >= BLOCK_THRESHOLD {
            RiskStatus::Blocked
        } else if score.points() >= REVIEW_THRESHOLD {
            RiskStatus::Review
        } else {
            RiskStatus::Approved
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "APPROVED" => Ok(RiskStatus::Approved),
            "REVIEW" => Ok(RiskStatus::Review),
            "BLOCKED" => Ok(RiskStatus::Blocked),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

/// Transaction attributes the scorer reads. Absent fields score zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    /// Transaction amount
    pub amount: Option<Decimal>,

    /// Local date and time of the transaction
    pub timestamp: Option<NaiveDateTime>,

    /// Payment rail
    #[serde(default)]
    pub channel: Channel,
}

impl TransactionSnapshot {
    /// Snapshot with every attribute present
    pub fn new(amount: Decimal, timestamp: NaiveDateTime, channel: Channel) -> Self {
        Self {
            amount: Some(amount),
            timestamp: Some(timestamp),
            channel,
        }
    }

    /// Set the amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the channel
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }
}

/// Independent partial contributions to the total score, in fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Transaction amount (0-50)
    Amount,
    /// Hour of day (0-30)
    TimeOfDay,
    /// Payment rail (0-25)
    Channel,
    /// Day of week (0-10)
    DayOfWeek,
}

impl RiskFactor {
    /// Human-readable factor name
    pub fn name(&self) -> &'static str {
        match self {
            RiskFactor::Amount => "Amount",
            RiskFactor::TimeOfDay => "Time of day",
            RiskFactor::Channel => "Channel",
            RiskFactor::DayOfWeek => "Day of week",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four sub-scores of one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Amount sub-score
    pub amount: u8,
    /// Time-of-day sub-score
    pub time_of_day: u8,
    /// Channel sub-score
    pub channel: u8,
    /// Day-of-week sub-score
    pub day_of_week: u8,
}

impl ScoreBreakdown {
    /// Sub-scores paired with their factor, in explanation order
    pub fn entries(&self) -> [(RiskFactor, u8); 4] {
        [
            (RiskFactor::Amount, self.amount),
            (RiskFactor::TimeOfDay, self.time_of_day),
            (RiskFactor::Channel, self.channel),
            (RiskFactor::DayOfWeek, self.day_of_week),
        ]
    }

    /// Unclamped sum of the sub-scores
    pub fn raw_total(&self) -> u32 {
        self.entries().iter().map(|(_, points)| u32::from(*points)).sum()
    }

    /// Sum of the sub-scores, clamped to [`MAX_SCORE`]
    pub fn total(&self) -> RiskScore {
        RiskScore::new(self.raw_total())
    }
}

/// One explanation line: which factor, what was observed, how many points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorContribution {
    /// Factor
    pub factor: RiskFactor,

    /// Points contributed
    pub points: u8,

    /// Observed input, rendered
    pub detail: String,
}

impl fmt::Display for FactorContribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (+{})", self.factor, self.detail, self.points)
    }
}

/// Composition of a score: non-zero factors only, amount → time → channel → day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// Total score the factors add up to (clamped)
    pub score: RiskScore,

    /// Contributing factors
    pub factors: Vec<FactorContribution>,
}

impl Explanation {
    /// Whether no factor contributed
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}%", self.score)?;
        writeln!(f, "Reasons:")?;
        for factor in &self.factors {
            writeln!(f, "- {}", factor)?;
        }
        Ok(())
    }
}

/// Risk assessment result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Clamped total score
    pub score: RiskScore,

    /// Decision derived from `score`
    pub status: RiskStatus,

    /// Per-factor composition of `score`
    pub explanation: Explanation,
}

/// Full upper-case English weekday name
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// `HH:MM` rendering of a timestamp's local time
pub fn clock_time(timestamp: &NaiveDateTime) -> String {
    format!("{:02}:{:02}", timestamp.hour(), timestamp.minute())
}

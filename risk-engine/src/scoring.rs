//! Risk scoring engine
//!
//! Four independent rules, each with its weight baked into its output range:
//!
//! | factor      | range | share of ceiling |
//! |-------------|-------|------------------|
//! | amount      | 0-50  | ~40%             |
//! | time of day | 0-30  | ~30%             |
//! | channel     | 0-25  | ~20%             |
//! | day of week | 0-10  | ~10%             |
//!
//! The sum can reach 115 and is clamped to 100.

use crate::types::{clock_time, weekday_name};
use crate::{
    Channel, Explanation, FactorContribution, RiskFactor, RiskStatus, ScoreBreakdown, ScoreResult,
    TransactionSnapshot,
};
use chrono::{Datelike, Timelike, Weekday};
use rust_decimal::Decimal;
use tracing::debug;

/// Amount rule. Thresholds are strict except at 1000 and 500, which are
/// inclusive.
pub fn amount_points(amount: Option<Decimal>) -> u8 {
    let amount = match amount {
        Some(a) if a > Decimal::ZERO => a,
        _ => return 0,
    };

    if amount > Decimal::from(15_000) {
        50
    } else if amount > Decimal::from(10_000) {
        45
    } else if amount > Decimal::from(5_000) {
        40
    } else if amount > Decimal::from(2_000) {
        30
    } else if amount >= Decimal::from(1_000) {
        20
    } else if amount >= Decimal::from(500) {
        10
    } else {
        0
    }
}

/// Time-of-day rule over the local hour (0-23).
pub fn time_of_day_points(hour: u32) -> u8 {
    match hour {
        // late night
        0..=5 => 30,
        // night
        22..=23 => 20,
        // evening peak
        17..=19 => 0,
        // business hours
        9..=16 => 0,
        // early morning
        6..=8 => 5,
        // 20:00-21:59
        _ => 10,
    }
}

/// Channel rule.
pub fn channel_points(channel: Channel) -> u8 {
    match channel {
        Channel::Pix => 25,
        Channel::Ted => 15,
        Channel::Card => 12,
        Channel::Doc => 8,
        Channel::Boleto => 5,
        Channel::Unrecognized => 0,
    }
}

/// Day-of-week rule.
pub fn day_of_week_points(day: Weekday) -> u8 {
    match day {
        Weekday::Sat | Weekday::Sun => 10,
        Weekday::Fri => 5,
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => 0,
    }
}

/// Risk scorer
///
/// Stateless; a single value can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    /// Create new risk scorer
    pub fn new() -> Self {
        Self
    }

    /// Compute the four sub-scores. Absent fields contribute zero.
    pub fn breakdown(&self, tx: &TransactionSnapshot) -> ScoreBreakdown {
        ScoreBreakdown {
            amount: amount_points(tx.amount),
            time_of_day: tx.timestamp.map_or(0, |ts| time_of_day_points(ts.hour())),
            channel: channel_points(tx.channel),
            day_of_week: tx.timestamp.map_or(0, |ts| day_of_week_points(ts.weekday())),
        }
    }

    /// Score a transaction and derive its status
    pub fn evaluate(&self, tx: &TransactionSnapshot) -> ScoreResult {
        let breakdown = self.breakdown(tx);
        let score = breakdown.total();
        let status = RiskStatus::from(score);

        debug!(
            score = score.points(),
            raw_score = breakdown.raw_total(),
            status = %status,
            amount = breakdown.amount,
            time_of_day = breakdown.time_of_day,
            channel = breakdown.channel,
            day_of_week = breakdown.day_of_week,
            "Risk score calculated"
        );

        ScoreResult {
            score,
            status,
            explanation: Self::explanation_from(tx, &breakdown),
        }
    }

    /// Explain the composition of a transaction's score
    pub fn explain(&self, tx: &TransactionSnapshot) -> Explanation {
        Self::explanation_from(tx, &self.breakdown(tx))
    }

    fn explanation_from(tx: &TransactionSnapshot, breakdown: &ScoreBreakdown) -> Explanation {
        let factors = breakdown
            .entries()
            .into_iter()
            .filter(|(_, points)| *points > 0)
            .map(|(factor, points)| FactorContribution {
                factor,
                points,
                detail: Self::detail(tx, factor),
            })
            .collect();

        Explanation {
            score: breakdown.total(),
            factors,
        }
    }

    // Only called for factors with points > 0, so the inputs are present.
    fn detail(tx: &TransactionSnapshot, factor: RiskFactor) -> String {
        match factor {
            RiskFactor::Amount => tx.amount.map(|a| a.to_string()).unwrap_or_default(),
            RiskFactor::TimeOfDay => tx.timestamp.as_ref().map(clock_time).unwrap_or_default(),
            RiskFactor::Channel => tx.channel.label().to_string(),
            RiskFactor::DayOfWeek => tx
                .timestamp
                .map(|ts| weekday_name(ts.weekday()).to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskScore;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    // 2026-01-13 is a Tuesday, 2026-01-17 a Saturday
    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn snapshot(amount: Decimal, day: u32, hour: u32, channel: Channel) -> TransactionSnapshot {
        TransactionSnapshot::new(amount, at(day, hour), channel)
    }

    #[test]
    fn test_high_value_pix_is_blocked() {
        let result = RiskScorer::new().evaluate(&snapshot(dec!(20000), 13, 14, Channel::Pix));

        assert_eq!(result.score.points(), 75);
        assert_eq!(result.status, RiskStatus::Blocked);
    }

    #[test]
    fn test_mid_value_boleto_goes_to_review() {
        let result = RiskScorer::new().evaluate(&snapshot(dec!(8000), 13, 14, Channel::Boleto));

        assert_eq!(result.score.points(), 45);
        assert_eq!(result.status, RiskStatus::Review);
    }

    #[test]
    fn test_low_value_boleto_is_approved() {
        let result = RiskScorer::new().evaluate(&snapshot(dec!(300), 13, 14, Channel::Boleto));

        assert_eq!(result.score.points(), 5);
        assert_eq!(result.status, RiskStatus::Approved);
    }

    #[test]
    fn test_late_night_pix_is_blocked() {
        let result = RiskScorer::new().evaluate(&snapshot(dec!(1000), 13, 3, Channel::Pix));

        assert_eq!(result.score.points(), 75);
        assert_eq!(result.status, RiskStatus::Blocked);
    }

    #[test]
    fn test_saturday_adds_weekend_points() {
        let result = RiskScorer::new().evaluate(&snapshot(dec!(100), 17, 14, Channel::Boleto));

        assert_eq!(result.score.points(), 15);
        assert_eq!(result.status, RiskStatus::Approved);
    }

    #[test]
    fn test_mid_value_pix_goes_to_review() {
        let result = RiskScorer::new().evaluate(&snapshot(dec!(8000), 13, 14, Channel::Pix));

        assert_eq!(result.score.points(), 65);
        assert_eq!(result.status, RiskStatus::Review);
    }

    #[test]
    fn test_score_is_clamped_at_100() {
        // 50 + 30 + 25 + 10 = 115
        let tx = snapshot(dec!(20000), 17, 3, Channel::Pix);
        let scorer = RiskScorer::new();

        assert_eq!(scorer.breakdown(&tx).raw_total(), 115);
        let result = scorer.evaluate(&tx);
        assert_eq!(result.score, RiskScore::new(100));
        assert_eq!(result.status, RiskStatus::Blocked);
    }

    #[test]
    fn test_amount_boundaries() {
        assert_eq!(amount_points(Some(dec!(15000.01))), 50);
        assert_eq!(amount_points(Some(dec!(15000))), 45);
        assert_eq!(amount_points(Some(dec!(10000))), 40);
        assert_eq!(amount_points(Some(dec!(5000))), 30);
        assert_eq!(amount_points(Some(dec!(2000))), 20);
        assert_eq!(amount_points(Some(dec!(1000))), 20);
        assert_eq!(amount_points(Some(dec!(999.99))), 10);
        assert_eq!(amount_points(Some(dec!(500))), 10);
        assert_eq!(amount_points(Some(dec!(499.99))), 0);
        assert_eq!(amount_points(Some(dec!(0.01))), 0);
        assert_eq!(amount_points(Some(Decimal::ZERO)), 0);
        assert_eq!(amount_points(Some(dec!(-5000))), 0);
        assert_eq!(amount_points(None), 0);
    }

    #[test]
    fn test_time_of_day_bands_cover_every_hour() {
        let expected = [
            30, 30, 30, 30, 30, 30, // 00-05
            5, 5, 5, // 06-08
            0, 0, 0, 0, 0, 0, 0, 0, // 09-16
            0, 0, 0, // 17-19
            10, 10, // 20-21
            20, 20, // 22-23
        ];

        for (hour, points) in expected.iter().enumerate() {
            assert_eq!(time_of_day_points(hour as u32), *points, "hour {}", hour);
        }
    }

    #[test]
    fn test_channel_table() {
        assert_eq!(channel_points(Channel::Pix), 25);
        assert_eq!(channel_points(Channel::Ted), 15);
        assert_eq!(channel_points(Channel::Card), 12);
        assert_eq!(channel_points(Channel::Doc), 8);
        assert_eq!(channel_points(Channel::Boleto), 5);
        assert_eq!(channel_points(Channel::Unrecognized), 0);
        assert_eq!(channel_points(Channel::from_label("pIx")), 25);
    }

    #[test]
    fn test_day_of_week_table() {
        assert_eq!(day_of_week_points(Weekday::Mon), 0);
        assert_eq!(day_of_week_points(Weekday::Thu), 0);
        assert_eq!(day_of_week_points(Weekday::Fri), 5);
        assert_eq!(day_of_week_points(Weekday::Sat), 10);
        assert_eq!(day_of_week_points(Weekday::Sun), 10);
    }

    #[test]
    fn test_missing_fields_contribute_nothing() {
        let scorer = RiskScorer::new();

        let empty = scorer.evaluate(&TransactionSnapshot::default());
        assert_eq!(empty.score.points(), 0);
        assert_eq!(empty.status, RiskStatus::Approved);
        assert!(empty.explanation.is_empty());

        let no_timestamp = TransactionSnapshot::default()
            .with_amount(dec!(20000))
            .with_channel(Channel::Pix);
        let breakdown = scorer.breakdown(&no_timestamp);
        assert_eq!(breakdown.time_of_day, 0);
        assert_eq!(breakdown.day_of_week, 0);
        assert_eq!(breakdown.total().points(), 75);
    }

    #[test]
    fn test_explanation_lists_nonzero_factors_in_order() {
        // Friday 23:00, 1000 via TED: 20 + 20 + 15 + 5
        let tx = snapshot(dec!(1000), 16, 23, Channel::Ted);
        let explanation = RiskScorer::new().explain(&tx);

        let factors: Vec<_> = explanation.factors.iter().map(|f| f.factor).collect();
        assert_eq!(
            factors,
            vec![
                RiskFactor::Amount,
                RiskFactor::TimeOfDay,
                RiskFactor::Channel,
                RiskFactor::DayOfWeek
            ]
        );
        assert_eq!(explanation.score.points(), 60);
        assert_eq!(
            explanation.to_string(),
            "Score: 60%\nReasons:\n\
             - Amount: 1000 (+20)\n\
             - Time of day: 23:00 (+20)\n\
             - Channel: TED (+15)\n\
             - Day of week: FRIDAY (+5)\n"
        );
    }

    #[test]
    fn test_explanation_omits_zero_factors() {
        let tx = snapshot(dec!(300), 13, 14, Channel::Boleto);
        let explanation = RiskScorer::new().explain(&tx);

        assert_eq!(explanation.factors.len(), 1);
        assert_eq!(explanation.factors[0].factor, RiskFactor::Channel);
        assert_eq!(explanation.factors[0].detail, "BOLETO");
    }

    #[test]
    fn test_explain_agrees_with_evaluate() {
        let scorer = RiskScorer::new();
        let tx = snapshot(dec!(12000), 18, 21, Channel::Card);

        let result = scorer.evaluate(&tx);
        let explanation = scorer.explain(&tx);

        assert_eq!(result.explanation, explanation);
        let sum: u32 = explanation.factors.iter().map(|f| u32::from(f.points)).sum();
        assert_eq!(RiskScore::new(sum), result.score);
    }
}

//! Rate table used by the payment schedule calculation.
//!
//! Every business constant the calculator depends on lives here, so a change
//! of fee or tax policy is a configuration change rather than a code change.

use anyhow::{Context, bail};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Business policy applied when building a payment schedule.
///
/// All rates are decimals (`0.05` is 5%), never percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePolicy {
    /// Smallest deal value that can be financed.
    #[serde(default = "default_minimum_value")]
    pub minimum_value: Decimal,
    /// Financing fee charged per week on the deal value.
    #[serde(default = "default_service_fee_rate")]
    pub service_fee_rate: Decimal,
    /// Custom durations longer than this many weeks pay the surcharge.
    #[serde(default = "default_surcharge_threshold_weeks")]
    pub surcharge_threshold_weeks: u32,
    /// Surcharge applied to value plus service fee on long custom durations.
    #[serde(default = "default_surcharge_rate")]
    pub surcharge_rate: Decimal,
    /// VAT applied to the fee-inclusive subtotal.
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,
    /// Share of the grand total due immediately.
    #[serde(default = "default_upfront_share")]
    pub upfront_share: Decimal,
    /// Week counts offered as standard choices on the weeks select.
    ///
    /// Only read by callers building that select through
    /// [`RatePolicy::is_preset`]; the calculator accepts any preset count.
    #[serde(default = "default_preset_weeks")]
    pub preset_weeks: Vec<u32>,
}

fn default_minimum_value() -> Decimal {
    dec!(1000)
}

fn default_service_fee_rate() -> Decimal {
    dec!(0.05)
}

fn default_surcharge_threshold_weeks() -> u32 {
    2
}

fn default_surcharge_rate() -> Decimal {
    dec!(0.05)
}

fn default_vat_rate() -> Decimal {
    dec!(0.075)
}

fn default_upfront_share() -> Decimal {
    dec!(0.5)
}

fn default_preset_weeks() -> Vec<u32> {
    vec![1, 2, 3, 4]
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            minimum_value: default_minimum_value(),
            service_fee_rate: default_service_fee_rate(),
            surcharge_threshold_weeks: default_surcharge_threshold_weeks(),
            surcharge_rate: default_surcharge_rate(),
            vat_rate: default_vat_rate(),
            upfront_share: default_upfront_share(),
            preset_weeks: default_preset_weeks(),
        }
    }
}

impl RatePolicy {
    /// Parses a policy from JSON and validates it.
    ///
    /// Fields missing from the document keep their default value, so
    /// `{"vat_rate": "0.1"}` only changes the VAT rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the policy fails
    /// [`RatePolicy::validate`].
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        let policy: RatePolicy =
            serde_json::from_str(json).context("Failed to parse rate policy JSON")?;

        if let Err(e) = policy.validate() {
            tracing::warn!(error = %e, "rejected rate policy");
            return Err(e);
        }

        Ok(policy)
    }

    /// Checks that every rate makes sense as a fee or tax rate.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let non_negative = [
            ("minimum_value", self.minimum_value),
            ("service_fee_rate", self.service_fee_rate),
            ("surcharge_rate", self.surcharge_rate),
            ("vat_rate", self.vat_rate),
        ];
        for (field, amount) in non_negative {
            if amount < Decimal::ZERO {
                bail!("{field} cannot be negative (got {amount})");
            }
        }

        if self.upfront_share < Decimal::ZERO || self.upfront_share > Decimal::ONE {
            bail!("upfront_share must be between 0 and 1 (got {})", self.upfront_share);
        }

        if self.preset_weeks.is_empty() {
            bail!("preset_weeks cannot be empty");
        }
        if self.preset_weeks.contains(&0) {
            bail!("preset_weeks cannot contain a zero-week choice");
        }

        Ok(())
    }

    /// Returns true when `weeks` is one of the standard choices.
    ///
    /// For callers rendering or checking the weeks select. It does not change
    /// how a schedule is calculated.
    pub fn is_preset(&self, weeks: u32) -> bool {
        self.preset_weeks.contains(&weeks)
    }

    /// Share of the grand total spread over the weekly installments.
    pub fn remaining_share(&self) -> Decimal {
        Decimal::ONE - self.upfront_share
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_policy_matches_dashboard_constants() {
        let policy = RatePolicy::default();

        assert_eq!(policy.minimum_value, dec!(1000));
        assert_eq!(policy.service_fee_rate, dec!(0.05));
        assert_eq!(policy.surcharge_threshold_weeks, 2);
        assert_eq!(policy.surcharge_rate, dec!(0.05));
        assert_eq!(policy.vat_rate, dec!(0.075));
        assert_eq!(policy.upfront_share, dec!(0.5));
        assert_eq!(policy.remaining_share(), dec!(0.5));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let policy = RatePolicy::from_json(r#"{ "vat_rate": "0.1", "preset_weeks": [2, 6] }"#)
            .unwrap();

        assert_eq!(policy.vat_rate, dec!(0.1));
        assert_eq!(policy.preset_weeks, vec![2, 6]);
        // Untouched fields fall back to the defaults
        assert_eq!(policy.minimum_value, dec!(1000));
        assert_eq!(policy.service_fee_rate, dec!(0.05));
        assert_eq!(policy.surcharge_threshold_weeks, 2);
    }

    #[test]
    fn test_empty_json_is_default_policy() {
        let policy = RatePolicy::from_json("{}").unwrap();
        assert_eq!(policy, RatePolicy::default());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = RatePolicy::from_json("{ vat_rate: ").unwrap_err();
        assert!(err.to_string().contains("rate policy JSON"));
    }

    #[rstest]
    #[case(r#"{ "vat_rate": "-0.01" }"#, "vat_rate")]
    #[case(r#"{ "service_fee_rate": "-1" }"#, "service_fee_rate")]
    #[case(r#"{ "minimum_value": "-5" }"#, "minimum_value")]
    #[case(r#"{ "upfront_share": "1.5" }"#, "upfront_share")]
    #[case(r#"{ "upfront_share": "-0.5" }"#, "upfront_share")]
    #[case(r#"{ "preset_weeks": [] }"#, "preset_weeks")]
    #[case(r#"{ "preset_weeks": [0, 4] }"#, "preset_weeks")]
    fn test_invalid_policy_is_rejected(#[case] json: &str, #[case] field: &str) {
        let err = RatePolicy::from_json(json).unwrap_err();
        assert!(err.to_string().contains(field), "unexpected error: {err}");
    }

    #[rstest]
    #[case(1, true)]
    #[case(4, true)]
    #[case(5, false)]
    #[case(0, false)]
    fn test_is_preset(#[case] weeks: u32, #[case] expected: bool) {
        assert_eq!(RatePolicy::default().is_preset(weeks), expected);
    }
}

//! Payment schedule calculation.
//!
//! Turns a deal value and a repayment duration into the fee and tax breakdown
//! plus the installment plan: half of the grand total upfront, the other half
//! spread evenly over the chosen weeks.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::RatePolicy;

/// Repayment duration picked on the deal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeksChoice {
    /// One of the standard week counts.
    Preset(u32),
    /// A free week count entered by the user, see [`CalculationInput::custom_weeks`].
    Custom,
}

/// Input parameters for a payment schedule calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// The principal deal value.
    pub value: Decimal,
    /// The selected repayment duration.
    pub weeks_selection: WeeksChoice,
    /// The user-entered week count, only read when the selection is custom.
    pub custom_weeks: Option<u32>,
}

impl CalculationInput {
    /// Resolves the effective number of weeks. A custom selection without a
    /// week count resolves to zero.
    pub fn weeks(&self) -> u32 {
        match self.weeks_selection {
            WeeksChoice::Preset(weeks) => weeks,
            WeeksChoice::Custom => self.custom_weeks.unwrap_or(0),
        }
    }
}

/// Fee breakdown and installment plan for a deal.
///
/// Amounts are exact; rounding for display happens in [`crate::display`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The principal deal value.
    pub deal_value: Decimal,
    /// Financing fee over the whole duration.
    pub service_fee: Decimal,
    /// Surcharge rate applied, zero unless a long custom duration was chosen.
    pub extra_fee_percent: Decimal,
    /// Surcharge amount.
    pub extra_fee: Decimal,
    /// Value plus service fee plus surcharge.
    pub sub_total: Decimal,
    /// VAT on the subtotal.
    pub vat: Decimal,
    /// Subtotal plus VAT.
    pub grand_total: Decimal,
    /// Amount due immediately.
    pub upfront_amount: Decimal,
    /// Number of weekly installments.
    pub weekly_count: u32,
    /// Amount of each weekly installment.
    pub weekly_amount: Decimal,
    /// False when the deal is below the financing floor or has no duration.
    pub is_valid: bool,
}

impl CalculationResult {
    /// The result for deals that cannot be financed: everything zero.
    pub fn invalid() -> Self {
        Self {
            deal_value: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            extra_fee_percent: Decimal::ZERO,
            extra_fee: Decimal::ZERO,
            sub_total: Decimal::ZERO,
            vat: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            upfront_amount: Decimal::ZERO,
            weekly_count: 0,
            weekly_amount: Decimal::ZERO,
            is_valid: false,
        }
    }

    /// Whether the extra fee row should be shown.
    pub fn shows_extra_fee(&self) -> bool {
        self.extra_fee_percent > Decimal::ZERO
    }

    /// The part of the grand total paid through weekly installments.
    pub fn remaining_amount(&self) -> Decimal {
        self.grand_total - self.upfront_amount
    }
}

/// Calculates the payment schedule with the default [`RatePolicy`].
pub fn calculate(input: &CalculationInput) -> CalculationResult {
    calculate_with_policy(input, &RatePolicy::default())
}

/// Calculates the payment schedule under the given policy.
///
/// Never fails: deals below `policy.minimum_value` or with fewer than one week
/// yield [`CalculationResult::invalid`].
///
/// The service fee is linear in value and weeks (no compounding). The
/// surcharge only applies to custom durations above the threshold and is
/// charged on value plus service fee. VAT is applied last, on the subtotal.
/// No remainder adjustment is made on the weekly amount.
pub fn calculate_with_policy(input: &CalculationInput, policy: &RatePolicy) -> CalculationResult {
    let value = input.value;
    if value < policy.minimum_value {
        tracing::debug!(%value, minimum = %policy.minimum_value, "deal value below financing floor");
        return CalculationResult::invalid();
    }

    let weeks = input.weeks();
    if weeks < 1 {
        tracing::debug!(selection = ?input.weeks_selection, "no repayment weeks selected");
        return CalculationResult::invalid();
    }

    let extra_fee_percent = match input.weeks_selection {
        WeeksChoice::Custom if weeks > policy.surcharge_threshold_weeks => policy.surcharge_rate,
        _ => Decimal::ZERO,
    };

    match breakdown(value, weeks, extra_fee_percent, policy) {
        Some(result) => {
            tracing::trace!(
                %value,
                weeks,
                service_fee = %result.service_fee,
                extra_fee = %result.extra_fee,
                vat = %result.vat,
                grand_total = %result.grand_total,
                weekly_amount = %result.weekly_amount,
                "payment schedule calculated"
            );
            result
        }
        None => {
            tracing::debug!(%value, weeks, "payment schedule overflows decimal range");
            CalculationResult::invalid()
        }
    }
}

/// Fee and installment arithmetic. `None` when an amount leaves the
/// `Decimal` range.
fn breakdown(
    value: Decimal,
    weeks: u32,
    extra_fee_percent: Decimal,
    policy: &RatePolicy,
) -> Option<CalculationResult> {
    let weeks_dec = Decimal::from(weeks);
    let service_fee = value
        .checked_mul(policy.service_fee_rate)?
        .checked_mul(weeks_dec)?;
    let financed = value.checked_add(service_fee)?;
    let extra_fee = financed.checked_mul(extra_fee_percent)?;
    let sub_total = financed.checked_add(extra_fee)?;
    let vat = sub_total.checked_mul(policy.vat_rate)?;
    let grand_total = sub_total.checked_add(vat)?;

    let upfront_amount = grand_total.checked_mul(policy.upfront_share)?;
    let remaining = grand_total.checked_mul(policy.remaining_share())?;
    let weekly_amount = remaining.checked_div(weeks_dec)?;

    Some(CalculationResult {
        deal_value: value,
        service_fee,
        extra_fee_percent,
        extra_fee,
        sub_total,
        vat,
        grand_total,
        upfront_amount,
        weekly_count: weeks,
        weekly_amount,
        is_valid: true,
    })
}

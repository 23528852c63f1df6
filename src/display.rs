//! Presentation adapter for the deal dashboard.
//!
//! Maps a [`CalculationResult`] onto the text and visibility flags the payment
//! preview panel renders. All rounding of amounts happens here.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::schedule::{CalculationResult, WeeksChoice};

/// How amounts are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Prefix placed before every amount.
    pub symbol: String,
    /// Maximum fraction digits shown in the breakdown rows.
    pub fraction_digits: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₦".to_string(),
            fraction_digits: 3,
        }
    }
}

impl CurrencyFormat {
    /// Formats a breakdown amount: grouped thousands, at most
    /// `fraction_digits` decimals, trailing zeros dropped.
    pub fn amount(&self, amount: Decimal) -> String {
        self.render(amount, self.fraction_digits)
    }

    /// Formats an installment amount in whole currency units.
    pub fn whole(&self, amount: Decimal) -> String {
        self.render(amount, 0)
    }

    fn render(&self, amount: Decimal, dp: u32) -> String {
        let rounded = amount
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let text = rounded.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (text.as_str(), None),
        };

        let mut out = String::with_capacity(text.len() + self.symbol.len() + 8);
        if rounded < Decimal::ZERO {
            out.push('-');
        }
        out.push_str(&self.symbol);
        out.push_str(&group_thousands(int_part));
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Rendered state of the payment preview panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPreview {
    /// The deal value.
    pub value: String,
    /// Financing fee over the whole duration.
    pub service_fee: String,
    /// Surcharge amount. `None` hides the extra fee row.
    pub extra_fee: Option<String>,
    /// VAT on the subtotal.
    pub vat: String,
    /// Grand total including VAT.
    pub total: String,
    /// Amount due immediately, in whole units.
    pub upfront: String,
    /// Number of weekly installments.
    pub weekly_count: u32,
    /// Amount of each weekly installment, in whole units.
    pub weekly_amount: String,
    /// Whether the breakdown panel is shown at all.
    pub breakdown_visible: bool,
    /// Whether the custom weeks field is shown.
    pub custom_weeks_visible: bool,
}

impl PaymentPreview {
    /// Renders a result with the default naira format.
    pub fn new(result: &CalculationResult, selection: &WeeksChoice) -> Self {
        Self::with_format(result, selection, &CurrencyFormat::default())
    }

    /// Renders a result. Invalid results show zero everywhere with the
    /// breakdown and extra fee row hidden.
    pub fn with_format(
        result: &CalculationResult,
        selection: &WeeksChoice,
        format: &CurrencyFormat,
    ) -> Self {
        let custom_weeks_visible = matches!(selection, WeeksChoice::Custom);

        if !result.is_valid {
            let zero = format.amount(Decimal::ZERO);
            return Self {
                value: zero.clone(),
                service_fee: zero.clone(),
                extra_fee: None,
                vat: zero.clone(),
                total: zero.clone(),
                upfront: zero.clone(),
                weekly_count: 0,
                weekly_amount: zero,
                breakdown_visible: false,
                custom_weeks_visible,
            };
        }

        Self {
            value: format.amount(result.deal_value),
            service_fee: format.amount(result.service_fee),
            extra_fee: result
                .shows_extra_fee()
                .then(|| format.amount(result.extra_fee)),
            vat: format.amount(result.vat),
            total: format.amount(result.grand_total),
            upfront: format.whole(result.upfront_amount),
            weekly_count: result.weekly_count,
            weekly_amount: format.whole(result.weekly_amount),
            breakdown_visible: true,
            custom_weeks_visible,
        }
    }
}

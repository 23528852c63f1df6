//! `deal_schedule` calculates the payment schedule of a marketplace deal.
//!
//! A deal value and a repayment duration in weeks are turned into:
//! - **Service fee**: 5% of the value per week, linear in value and duration.
//! - **Extra fee**: a 5% surcharge on value plus service fee, only for custom
//!   durations longer than two weeks.
//! - **VAT**: 7.5% of the fee-inclusive subtotal.
//! - **Installment plan**: half of the grand total upfront, the other half
//!   spread evenly over the weeks.
//!
//! Deals under 1,000 or without a duration are not financeable and produce a
//! zeroed result flagged `is_valid = false`. The rates live in [`RatePolicy`]
//! and can be loaded from JSON.
//!
//! ## Usage
//!
//! ```rust
//! use deal_schedule::{calculate, CalculationInput, PaymentPreview, WeeksChoice};
//! use rust_decimal_macros::dec;
//!
//! let input = CalculationInput {
//!     value: dec!(10_000),
//!     weeks_selection: WeeksChoice::Custom,
//!     custom_weeks: Some(5),
//! };
//!
//! let result = calculate(&input);
//! assert!(result.is_valid);
//! assert_eq!(result.extra_fee, dec!(625));
//! assert_eq!(result.grand_total, dec!(14_109.375));
//!
//! let preview = PaymentPreview::new(&result, &input.weeks_selection);
//! println!("Upfront: {}", preview.upfront);
//! println!("{} x {}", preview.weekly_count, preview.weekly_amount);
//! ```
//!
//! Raw form values can be fed in directly:
//!
//! ```rust
//! use deal_schedule::{calculate_with_policy, CalculationInput, RatePolicy};
//!
//! let policy = RatePolicy::from_json(r#"{ "vat_rate": "0.1" }"#).unwrap();
//! let input = CalculationInput::from_form("25000", "4", "");
//! let result = calculate_with_policy(&input, &policy);
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! ```

pub mod display;
pub mod form;
pub mod policy;
pub mod schedule;

pub use display::{CurrencyFormat, PaymentPreview};
pub use form::{CUSTOM_WEEKS_OPTION, parse_value, parse_weeks};
pub use policy::RatePolicy;
pub use schedule::{CalculationInput, CalculationResult, WeeksChoice, calculate, calculate_with_policy};

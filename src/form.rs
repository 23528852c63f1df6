//! Coercion of raw deal-form values into calculator input.
//!
//! Form fields arrive as free text and are parsed leniently: a numeric prefix
//! is accepted ("4 weeks" reads as 4) and anything unreadable becomes zero, so
//! a half-typed form simply yields an invalid schedule instead of an error.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::schedule::{CalculationInput, WeeksChoice};

/// Select value marking the custom duration option.
pub const CUSTOM_WEEKS_OPTION: &str = "custom";

/// Parses a deal value. Unreadable or negative input yields zero.
///
/// Accepts exponent notation ("1e4", "2.5E3") as number inputs may
/// produce it.
pub fn parse_value(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        return Decimal::ZERO;
    }

    let (mantissa, exponent) = number_prefix(trimmed.strip_prefix('+').unwrap_or(trimmed));
    if mantissa.is_empty() {
        return Decimal::ZERO;
    }

    let mantissa = if mantissa.starts_with('.') {
        format!("0{mantissa}")
    } else {
        mantissa.to_string()
    };
    let parsed = match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix('+').unwrap_or(exp);
            Decimal::from_scientific(&format!("{mantissa}e{exp}"))
        }
        None => Decimal::from_str(&mantissa),
    };
    parsed.unwrap_or(Decimal::ZERO)
}

/// Parses a week count. Unreadable or negative input yields zero.
pub fn parse_weeks(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    // Overflowing counts saturate rather than wrap
    match &digits[..end] {
        "" => 0,
        n => n.parse().unwrap_or(u32::MAX),
    }
}

/// Longest prefix of `s` that reads as an unsigned decimal number, split
/// into its mantissa and optional exponent digits (sign included).
fn number_prefix(s: &str) -> (&str, Option<&str>) {
    let bytes = s.as_bytes();
    let mut seen_digit = false;
    let mut seen_point = false;
    let mut mantissa_end = 0;
    let mut cursor = 0;
    while let Some(&b) = bytes.get(cursor) {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                mantissa_end = cursor + 1;
            }
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        cursor += 1;
    }

    if !seen_digit {
        return ("", None);
    }
    let mantissa = &s[..mantissa_end];

    // A dangling "e" or "e+" is ignored, as parseFloat does
    if !matches!(bytes.get(cursor), Some(b'e' | b'E')) {
        return (mantissa, None);
    }
    let exp_start = cursor + 1;
    let mut exp_end = exp_start;
    if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
        exp_end += 1;
    }
    let digits_start = exp_end;
    while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
        exp_end += 1;
    }

    if exp_end == digits_start {
        (mantissa, None)
    } else {
        (mantissa, Some(&s[exp_start..exp_end]))
    }
}

impl WeeksChoice {
    /// Reads the weeks select value: the custom option or a week count.
    pub fn from_form(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(CUSTOM_WEEKS_OPTION) {
            WeeksChoice::Custom
        } else {
            WeeksChoice::Preset(parse_weeks(trimmed))
        }
    }
}

impl FromStr for WeeksChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(WeeksChoice::from_form(s))
    }
}

impl CalculationInput {
    /// Builds the input from the three raw form fields.
    pub fn from_form(value: &str, weeks_select: &str, custom_weeks: &str) -> Self {
        let custom_weeks = match parse_weeks(custom_weeks) {
            0 => None,
            weeks => Some(weeks),
        };

        Self {
            value: parse_value(value),
            weeks_selection: WeeksChoice::from_form(weeks_select),
            custom_weeks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::calculate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("10000", dec!(10000))]
    #[case("  2500.75 ", dec!(2500.75))]
    #[case("1500abc", dec!(1500))]
    #[case("12.5.3", dec!(12.5))]
    #[case(".5", dec!(0.5))]
    #[case("7.", dec!(7))]
    #[case("+42", dec!(42))]
    #[case("-3000", dec!(0))]
    #[case("abc", dec!(0))]
    #[case("", dec!(0))]
    #[case(".", dec!(0))]
    #[case("1e4", dec!(10000))]
    #[case("2.5E3", dec!(2500))]
    #[case("7.e2", dec!(700))]
    #[case("1.5e+3", dec!(1500))]
    #[case("12500e-1", dec!(1250))]
    #[case("1e", dec!(1))]
    #[case("3e+", dec!(3))]
    fn test_parse_value(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_value(raw), expected);
    }

    #[rstest]
    #[case("4", 4)]
    #[case(" 12 ", 12)]
    #[case("3 weeks", 3)]
    #[case("2.9", 2)]
    #[case("+6", 6)]
    #[case("-2", 0)]
    #[case("", 0)]
    #[case("weeks", 0)]
    #[case("99999999999", u32::MAX)]
    fn test_parse_weeks(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(parse_weeks(raw), expected);
    }

    #[rstest]
    #[case("custom", WeeksChoice::Custom)]
    #[case(" Custom ", WeeksChoice::Custom)]
    #[case("4", WeeksChoice::Preset(4))]
    #[case("", WeeksChoice::Preset(0))]
    #[case("soon", WeeksChoice::Preset(0))]
    fn test_weeks_choice_from_form(#[case] raw: &str, #[case] expected: WeeksChoice) {
        assert_eq!(WeeksChoice::from_form(raw), expected);
        assert_eq!(raw.parse::<WeeksChoice>().unwrap(), expected);
    }

    #[test]
    fn test_input_from_form_fields() {
        let input = CalculationInput::from_form("10000", "custom", "5");
        assert_eq!(input.value, dec!(10000));
        assert_eq!(input.weeks_selection, WeeksChoice::Custom);
        assert_eq!(input.custom_weeks, Some(5));
        assert_eq!(calculate(&input).grand_total, dec!(14109.375));
    }

    #[test]
    fn test_exponent_value_gives_valid_schedule() {
        let input = CalculationInput::from_form("1e4", "4", "");
        assert_eq!(input.value, dec!(10000));

        let result = calculate(&input);
        assert!(result.is_valid);
        assert_eq!(result.grand_total, dec!(12900));
    }

    #[test]
    fn test_blank_custom_weeks_gives_invalid_schedule() {
        let input = CalculationInput::from_form("10000", "custom", "");
        assert_eq!(input.custom_weeks, None);
        assert!(!calculate(&input).is_valid);
    }

    #[test]
    fn test_unreadable_value_gives_invalid_schedule() {
        let input = CalculationInput::from_form("ten thousand", "4", "");
        assert_eq!(input.value, dec!(0));
        assert!(!calculate(&input).is_valid);
    }
}

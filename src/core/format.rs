//! # Number Formatting
//!
//! Renders engine values the way a pocket calculator shows them: general
//! format, at most 15 significant digits, trailing zeros trimmed, switching
//! to `1.5E+20` style scientific notation outside the fixed range.
//!
//! The decimal separator is configuration, not ambient locale state, so the
//! same input sequence always produces the same display.

/// Significant digits kept when rendering a computed value.
pub const SIGNIFICANT_DIGITS: usize = 15;

/// Smallest decimal exponent still rendered in fixed notation.
const MIN_FIXED_EXPONENT: i32 = -4;

/// Separator-aware formatter/parser for display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    separator: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(".")
    }
}

impl NumberFormat {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Format a finite value for the display.
    ///
    /// Exact zero (including `-0.0` left over from subtraction) is always `"0"`.
    pub fn format(&self, value: f64) -> String {
        if value == 0.0 {
            return "0".to_string();
        }

        // `{:.14e}` rounds to 15 significant digits and hands us the exponent
        let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value.abs());
        let Some((mantissa, exponent)) = scientific.split_once('e') else {
            return scientific;
        };
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
        let digits = digits.trim_end_matches('0');

        let body = if (MIN_FIXED_EXPONENT..SIGNIFICANT_DIGITS as i32).contains(&exponent) {
            self.fixed(digits, exponent)
        } else {
            self.scientific(digits, exponent)
        };

        if value.is_sign_negative() {
            format!("-{body}")
        } else {
            body
        }
    }

    /// Parse display text back into a number.
    ///
    /// Anything unparsable (the error token, a dangling exponent after
    /// backspace) reads as zero.
    pub fn parse(&self, text: &str) -> f64 {
        let normalized = if self.separator == "." {
            text.to_string()
        } else {
            text.replace(self.separator.as_str(), ".")
        };
        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    fn fixed(&self, digits: &str, exponent: i32) -> String {
        if exponent < 0 {
            let zeros = "0".repeat((-exponent - 1) as usize);
            return format!("0{}{zeros}{digits}", self.separator);
        }

        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            format!("{digits}{}", "0".repeat(int_len - digits.len()))
        } else {
            let (int_part, frac_part) = digits.split_at(int_len);
            format!("{int_part}{}{frac_part}", self.separator)
        }
    }

    fn scientific(&self, digits: &str, exponent: i32) -> String {
        let (lead, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            lead.to_string()
        } else {
            format!("{lead}{}{rest}", self.separator)
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}E{sign}{:02}", exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_render_plain() {
        let f = NumberFormat::default();
        assert_eq!(f.format(8.0), "8");
        assert_eq!(f.format(-14.0), "-14");
        assert_eq!(f.format(1_000_000.0), "1000000");
        assert_eq!(f.format(123_456_789_012_345.0), "123456789012345");
    }

    #[test]
    fn test_negative_zero_renders_as_zero() {
        let f = NumberFormat::default();
        assert_eq!(f.format(-0.0), "0");
        assert_eq!(f.format(0.1 - 0.1), "0");
    }

    #[test]
    fn test_fifteen_significant_digits() {
        let f = NumberFormat::default();
        assert_eq!(f.format(0.1 + 0.2), "0.3");
        assert_eq!(f.format(1.0 / 3.0), "0.333333333333333");
        assert_eq!(f.format(2.0 / 3.0), "0.666666666666667");
        assert_eq!(f.format(2f64.sqrt()), "1.4142135623731");
    }

    #[test]
    fn test_scientific_outside_fixed_range() {
        let f = NumberFormat::default();
        assert_eq!(f.format(1e15), "1E+15");
        assert_eq!(f.format(1e16), "1E+16");
        assert_eq!(f.format(-2.5e20), "-2.5E+20");
        assert_eq!(f.format(1e-6), "1E-06");
        assert_eq!(f.format(0.00001), "1E-05");
        assert_eq!(f.format(0.0001), "0.0001");
        assert_eq!(f.format(0.00012345), "0.00012345");
    }

    #[test]
    fn test_custom_separator() {
        let f = NumberFormat::new(",");
        assert_eq!(f.format(2.5), "2,5");
        assert_eq!(f.format(1.25e-7), "1,25E-07");
        assert_eq!(f.parse("2,5"), 2.5);
    }

    #[test]
    fn test_parse_fallbacks() {
        let f = NumberFormat::default();
        assert_eq!(f.parse("0."), 0.0);
        assert_eq!(f.parse("-0"), 0.0);
        assert_eq!(f.parse("12.5"), 12.5);
        assert_eq!(f.parse("1E+2"), 100.0);
        assert_eq!(f.parse("1E+"), 0.0);
        assert_eq!(f.parse("Error"), 0.0);
    }
}

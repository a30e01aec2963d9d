//! Native coin amounts: APT (major unit) <-> octas (minor unit)

use std::fmt;

use thiserror::Error;

/// Number of octas in one APT
pub const OCTAS_PER_APT: u64 = 100_000_000;
const DECIMALS: usize = 8;

/// Amount in octas, the smallest on-chain unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Octas(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("not a number: {0:?}")]
    Invalid(String),
    #[error("amount must be greater than zero")]
    NonPositive,
    #[error("amount is too large")]
    Overflow,
}

impl Octas {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal APT string into octas, flooring anything past 8 decimals.
    ///
    /// Accepts an optional sign and surrounding whitespace. Negative values parse
    /// successfully only as far as [`AmountError::NonPositive`] so callers can
    /// tell "-5" apart from "abc".
    pub fn parse_apt(input: &str) -> Result<Octas, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Invalid(input.to_string()));
        }

        let (negative, unsigned) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (integer_part, decimal_part) = match unsigned.split_once('.') {
            Some((int, dec)) => (int, dec),
            None => (unsigned, ""),
        };

        if integer_part.is_empty() && decimal_part.is_empty() {
            return Err(AmountError::Invalid(input.to_string()));
        }
        if !integer_part.chars().all(|c| c.is_ascii_digit())
            || !decimal_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AmountError::Invalid(input.to_string()));
        }

        let all_zero = integer_part.chars().chain(decimal_part.chars()).all(|c| c == '0');
        if negative && !all_zero {
            return Err(AmountError::NonPositive);
        }

        let integer: u64 = if integer_part.is_empty() {
            0
        } else {
            integer_part
                .trim_start_matches('0')
                .parse::<u64>()
                .or_else(|_| {
                    if integer_part.chars().all(|c| c == '0') {
                        Ok(0)
                    } else {
                        Err(AmountError::Overflow)
                    }
                })?
        };

        // floor: drop digits beyond the 8th decimal
        let kept: String = decimal_part.chars().take(DECIMALS).collect();
        let padded = format!("{:0<width$}", kept, width = DECIMALS);
        let fraction: u64 = padded
            .parse()
            .map_err(|_| AmountError::Invalid(input.to_string()))?;

        integer
            .checked_mul(OCTAS_PER_APT)
            .and_then(|v| v.checked_add(fraction))
            .map(Octas)
            .ok_or(AmountError::Overflow)
    }

    /// Parse a strictly positive APT amount (tip input)
    pub fn parse_positive_apt(input: &str) -> Result<Octas, AmountError> {
        let amount = Self::parse_apt(input)?;
        if amount.is_zero() {
            return Err(AmountError::NonPositive);
        }
        Ok(amount)
    }
}

impl From<u64> for Octas {
    fn from(value: u64) -> Self {
        Octas(value)
    }
}

/// Renders the APT value with trailing zeros trimmed, e.g. `1.5`, `0.00000001`, `3`
impl fmt::Display for Octas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / OCTAS_PER_APT;
        let remainder = self.0 % OCTAS_PER_APT;
        if remainder == 0 {
            write!(f, "{}", whole)
        } else {
            let decimal = format!("{:08}", remainder);
            write!(f, "{}.{}", whole, decimal.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apt() {
        assert_eq!(Octas::parse_apt("1").unwrap(), Octas(100_000_000));
        assert_eq!(Octas::parse_apt("1.5").unwrap(), Octas(150_000_000));
        assert_eq!(Octas::parse_apt("0.00000001").unwrap(), Octas(1));
        assert_eq!(Octas::parse_apt(".25").unwrap(), Octas(25_000_000));
        assert_eq!(Octas::parse_apt(" 2. ").unwrap(), Octas(200_000_000));
        assert_eq!(Octas::parse_apt("007").unwrap(), Octas(700_000_000));
    }

    #[test]
    fn test_parse_floors_extra_decimals() {
        assert_eq!(Octas::parse_apt("0.123456789").unwrap(), Octas(12_345_678));
        assert_eq!(Octas::parse_apt("1.999999999").unwrap(), Octas(199_999_999));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Octas::parse_apt(""), Err(AmountError::Invalid(_))));
        assert!(matches!(Octas::parse_apt("abc"), Err(AmountError::Invalid(_))));
        assert!(matches!(Octas::parse_apt("1.2.3"), Err(AmountError::Invalid(_))));
        assert!(matches!(Octas::parse_apt("."), Err(AmountError::Invalid(_))));
        assert!(matches!(Octas::parse_apt("1e8"), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(Octas::parse_positive_apt("0"), Err(AmountError::NonPositive));
        assert_eq!(Octas::parse_positive_apt("-5"), Err(AmountError::NonPositive));
        assert_eq!(Octas::parse_positive_apt("0.000000001"), Err(AmountError::NonPositive));
        assert_eq!(Octas::parse_positive_apt("-0"), Err(AmountError::NonPositive));
        assert_eq!(Octas::parse_positive_apt("3").unwrap(), Octas(300_000_000));
    }

    #[test]
    fn test_parse_overflow() {
        assert_eq!(
            Octas::parse_apt("184467440738"),
            Err(AmountError::Overflow)
        );
        assert_eq!(
            Octas::parse_apt("99999999999999999999999"),
            Err(AmountError::Overflow)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Octas(100_000_000).to_string(), "1");
        assert_eq!(Octas(150_000_000).to_string(), "1.5");
        assert_eq!(Octas(1).to_string(), "0.00000001");
        assert_eq!(Octas(0).to_string(), "0");
    }

    #[test]
    fn test_display_then_parse_is_exact() {
        for raw in [1u64, 99, 100_000_000, 123_456_789, 987_654_321_000] {
            let shown = Octas(raw).to_string();
            assert_eq!(Octas::parse_apt(&shown).unwrap(), Octas(raw));
        }
    }
}

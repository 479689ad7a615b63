//! Exact fixed-point token amounts.
//!
//! All monetary values are in base units (1 token = [`UNIT`] = 10^12 base
//! units). The allocation table publishes amounts as decimal strings with
//! up to twelve fractional digits; parsing is exact, and anything finer
//! than one base unit is rejected rather than rounded. The published
//! totals require bit-exact equality, so binary floating point never
//! touches an amount.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::UNIT;
use crate::error::AmountError;

/// Decimal digits covered by [`UNIT`].
pub const DECIMALS: u32 = 12;

/// A token amount in base units.
///
/// Wraps `u128`: the full published distribution is ~1.5 × 10^21 base
/// units, which fits with ample headroom. Every arithmetic step is
/// checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// An amount from raw base units.
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// An amount from a whole number of tokens.
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * UNIT)
    }

    /// The amount in base units.
    pub const fn units(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parse a decimal token amount exactly.
    ///
    /// Accepts `digits`, `digits.digits`, and bare fractional forms like
    /// `.5`. At most [`DECIMALS`] fractional digits; no signs, separators
    /// or exponents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(AmountError::MissingDigits);
        }
        if frac.len() > DECIMALS as usize {
            return Err(AmountError::TooManyDecimals { got: frac.len(), max: DECIMALS as usize });
        }

        let mut units: u128 = 0;
        for c in whole.chars() {
            let digit = c.to_digit(10).ok_or(AmountError::InvalidCharacter(c))? as u128;
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(digit))
                .ok_or(AmountError::Overflow)?;
        }
        units = units.checked_mul(UNIT).ok_or(AmountError::Overflow)?;

        // At most 12 digits: the fractional part is bounded by UNIT.
        let mut frac_units: u128 = 0;
        for c in frac.chars() {
            let digit = c.to_digit(10).ok_or(AmountError::InvalidCharacter(c))? as u128;
            frac_units = frac_units * 10 + digit;
        }
        frac_units *= 10u128.pow(DECIMALS - frac.len() as u32);

        units.checked_add(frac_units).map(Self).ok_or(AmountError::Overflow)
    }
}

impl fmt::Display for Amount {
    /// Canonical decimal form: fractional part trimmed of trailing zeros,
    /// omitted entirely when zero. Round-trips through [`FromStr`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:012}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

// On the wire an amount is a base-10 string of base units: u128 does not
// survive JSON readers that parse numbers into doubles.

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>().map(Self).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------

    #[test]
    fn parse_whole_tokens() {
        let a: Amount = "202500000".parse().unwrap();
        assert_eq!(a.units(), 202_500_000 * UNIT);
    }

    #[test]
    fn parse_fractional() {
        let a: Amount = "0.5".parse().unwrap();
        assert_eq!(a.units(), UNIT / 2);
    }

    #[test]
    fn parse_full_precision() {
        let a: Amount = "76698176.503760355067".parse().unwrap();
        assert_eq!(a.units(), 76_698_176_503_760_355_067);
    }

    #[test]
    fn parse_grand_total() {
        let a: Amount = "1499973176.503760355067".parse().unwrap();
        assert_eq!(a.units(), 1_499_973_176_503_760_355_067);
    }

    #[test]
    fn parse_bare_fraction() {
        let a: Amount = ".25".parse().unwrap();
        assert_eq!(a.units(), UNIT / 4);
    }

    #[test]
    fn parse_zero() {
        assert_eq!("0".parse::<Amount>().unwrap(), Amount::ZERO);
    }

    // ------------------------------------------------------------------
    // Parse errors
    // ------------------------------------------------------------------

    #[test]
    fn reject_empty() {
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
    }

    #[test]
    fn reject_lone_dot() {
        assert_eq!(".".parse::<Amount>(), Err(AmountError::MissingDigits));
    }

    #[test]
    fn reject_thirteen_decimals() {
        assert_eq!(
            "1.0000000000001".parse::<Amount>(),
            Err(AmountError::TooManyDecimals { got: 13, max: 12 })
        );
    }

    #[test]
    fn reject_sign() {
        assert_eq!("-1".parse::<Amount>(), Err(AmountError::InvalidCharacter('-')));
    }

    #[test]
    fn reject_second_dot() {
        assert_eq!("1.2.3".parse::<Amount>(), Err(AmountError::InvalidCharacter('.')));
    }

    #[test]
    fn reject_overflow() {
        // 39 nines: larger than u128::MAX even before scaling.
        let s = "9".repeat(39);
        assert_eq!(s.parse::<Amount>(), Err(AmountError::Overflow));
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    #[test]
    fn display_whole() {
        assert_eq!(Amount::from_tokens(337_500_000).to_string(), "337500000");
    }

    #[test]
    fn display_trims_trailing_zeros() {
        let a: Amount = "11797752.808988797".parse().unwrap();
        assert_eq!(a.to_string(), "11797752.808988797");
    }

    #[test]
    fn display_sub_token() {
        assert_eq!(Amount::from_units(1).to_string(), "0.000000000001");
    }

    // ------------------------------------------------------------------
    // Arithmetic
    // ------------------------------------------------------------------

    #[test]
    fn from_tokens_scales_by_unit() {
        assert_eq!(Amount::from_tokens(1).units(), UNIT);
        assert_eq!(Amount::from_tokens(1000).units(), 1000 * UNIT);
    }

    #[test]
    fn checked_add_overflow_is_none() {
        let max = Amount::from_units(u128::MAX);
        assert_eq!(max.checked_add(Amount::from_units(1)), None);
    }

    #[test]
    fn checked_sub_underflow_is_none() {
        assert_eq!(Amount::ZERO.checked_sub(Amount::from_units(1)), None);
    }

    // ------------------------------------------------------------------
    // Serde
    // ------------------------------------------------------------------

    #[test]
    fn serializes_as_base_unit_string() {
        let a: Amount = "1.5".parse().unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"1500000000000\"");
    }

    #[test]
    fn deserializes_from_base_unit_string() {
        let a: Amount = serde_json::from_str("\"1500000000000\"").unwrap();
        assert_eq!(a, "1.5".parse().unwrap());
    }

    // ------------------------------------------------------------------
    // proptest
    // ------------------------------------------------------------------

    proptest! {
        #[test]
        fn display_parse_round_trip(units in any::<u128>()) {
            let a = Amount::from_units(units);
            let back: Amount = a.to_string().parse().unwrap();
            prop_assert_eq!(a, back);
        }

        #[test]
        fn serde_round_trip(units in any::<u128>()) {
            let a = Amount::from_units(units);
            let json = serde_json::to_string(&a).unwrap();
            let back: Amount = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(a, back);
        }
    }
}

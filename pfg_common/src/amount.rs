use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// The gateway stores amounts with at most 15 significant digits, two of which are decimal places.
pub const MAX_AMOUNT_DIGITS: usize = 15;
const DECIMAL_PLACES: usize = 2;

//--------------------------------------       Amount        ---------------------------------------------------------
/// A fixed-point currency amount with exactly two decimal places, stored as an integer number of cents.
///
/// Equality is exact decimal equality, so `"234"`, `"234.0"` and `"234.00"` all compare equal.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(i64);

op!(binary Amount, Add, add);
op!(binary Amount, Sub, sub);
op!(inplace Amount, SubAssign, sub_assign);
op!(unary Amount, Neg, neg);

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid amount: {0}")]
pub struct AmountParseError(String);

impl Amount {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// The absolute difference between two amounts
    pub fn abs_diff(&self, other: &Amount) -> Amount {
        Self(self.0.abs_diff(other.0) as i64)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(AmountParseError(format!("'{s}' is not a decimal number")));
        }
        if unsigned.contains('.') && fraction.is_empty() {
            return Err(AmountParseError(format!("'{s}' is missing its decimal places")));
        }
        if fraction.len() > DECIMAL_PLACES {
            return Err(AmountParseError(format!("'{s}' has more than {DECIMAL_PLACES} decimal places")));
        }
        let whole = whole.trim_start_matches('0');
        if whole.len() > MAX_AMOUNT_DIGITS - DECIMAL_PLACES {
            return Err(AmountParseError(format!("'{s}' has more than {MAX_AMOUNT_DIGITS} digits")));
        }
        let whole_value = if whole.is_empty() { 0 } else { whole.parse::<i64>().map_err(|e| AmountParseError(e.to_string()))? };
        let fraction_value = format!("{fraction:0<2}").parse::<i64>().map_err(|e| AmountParseError(e.to_string()))?;
        let cents = whole_value * 100 + fraction_value;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

impl From<i64> for Amount {
    /// Converts a whole number of currency units into an `Amount`.
    fn from(value: i64) -> Self {
        Self(value * 100)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

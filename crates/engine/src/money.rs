use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer cents**.
///
/// Every rent rate, payment and balance in the engine goes through this type
/// so sums over many weeks never drift.
///
/// The value is signed:
/// - positive = money received / credit
/// - negative = money spent / arrears
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let rent = MoneyCents::new(250_00);
/// assert_eq!(rent.cents(), 25000);
/// assert_eq!(rent.to_string(), "$250.00");
/// assert_eq!((-rent).to_string(), "-$250.00");
/// ```
///
/// Parsing from user input (optional sign and `$`, rejects > 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("250".parse::<MoneyCents>().unwrap().cents(), 25000);
/// assert_eq!("$12.5".parse::<MoneyCents>().unwrap().cents(), 1250);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Largest magnitude accepted for a single amount ($100 billion).
    ///
    /// Summing millions of bounded amounts stays far from `i64` overflow.
    pub const MAX: MoneyCents = MoneyCents(10_000_000_000_000);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value (spending totals are reported as positive amounts).
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Reject amounts whose magnitude exceeds [`MoneyCents::MAX`].
    pub fn ensure_bounded(self) -> Result<Self, EngineError> {
        if self.0.unsigned_abs() > Self::MAX.0.unsigned_abs() {
            return Err(EngineError::InvalidAmount(format!(
                "amount {self} exceeds the limit of {}",
                Self::MAX
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        f.pad(&format!("{sign}${}.{:02}", abs / 100, abs % 100))
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(self.0.saturating_neg())
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a MoneyCents> for MoneyCents {
    fn sum<I: Iterator<Item = &'a MoneyCents>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal dollar string into cents.
    ///
    /// Accepts an optional leading `+`/`-`, an optional `$` and `,` thousands
    /// separators. At most 2 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s:?}"));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let rest = rest.trim_start().strip_prefix('$').unwrap_or(rest).replace(',', "");
        if rest.is_empty() {
            return Err(invalid());
        }

        let (whole, frac) = match rest.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (rest.as_str(), ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        if frac.len() > 2 {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }

        let dollars = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| overflow())?
        };
        let cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse::<i64>().map_err(|_| invalid())?,
        };

        let total = dollars
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        MoneyCents(if negative { -total } else { total })
            .ensure_bounded()
            .map_err(|_| overflow())
    }
}

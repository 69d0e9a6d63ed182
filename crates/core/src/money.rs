//! Fixed-point money amounts.
//!
//! Amounts are stored in the smallest currency unit (cents) so that sums are
//! exact: adding 0.10 a thousand times yields exactly 100.00.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

const CENTS_PER_UNIT: u64 = 100;

/// Non-negative amount with two fractional digits.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: u64,
}

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> u64 {
        self.cents
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.cents
            .checked_add(other.cents)
            .map(Money::from_cents)
            .ok_or_else(|| DomainError::invariant("money amount overflow"))
    }

    /// Exact sum of `amounts`; fails only on overflow.
    pub fn try_sum<I>(amounts: I) -> DomainResult<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.cents / CENTS_PER_UNIT,
            self.cents % CENTS_PER_UNIT
        )
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Parses `"12"`, `"12.5"` or `"12.50"`. Signs, exponents and more than two
    /// fractional digits are rejected rather than rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(DomainError::validation(format!("invalid amount: {s:?}")));
        }
        if frac.len() > 2 {
            return Err(DomainError::validation(format!(
                "amount has more than two decimal places: {s:?}"
            )));
        }

        let units: u64 = whole
            .parse()
            .map_err(|_| DomainError::validation(format!("amount out of range: {s:?}")))?;
        let frac_cents = match frac.len() {
            0 => 0,
            1 => u64::from(frac.as_bytes()[0] - b'0') * 10,
            _ => u64::from(frac.as_bytes()[0] - b'0') * 10 + u64::from(frac.as_bytes()[1] - b'0'),
        };

        units
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(frac_cents))
            .map(Money::from_cents)
            .ok_or_else(|| DomainError::validation(format!("amount out of range: {s:?}")))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

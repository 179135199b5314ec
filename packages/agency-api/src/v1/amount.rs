use std::{fmt, str::FromStr};

use derive_more::{Add, AddAssign, Display, Error, Sub, Sum};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

/// An amount of money, stored as a whole number of cents.
///
/// The backend is not consistent about how it encodes money: the same field
/// may arrive as `1500`, `1500.5`, `"1500.50"` or `"1 500,50"` depending on
/// the endpoint. All of these decode to the same [`Amount`]. Fractions of a
/// cent are rounded half away from zero.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Add, AddAssign, Sub, Sum,
)]
pub struct Amount(i64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from a whole number of currency units.
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// The amount in cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Subtract, clamping the result at zero.
    ///
    /// Balances are never reported as negative: an overpaid invoice has
    /// nothing left to pay.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0).max(0))
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Convert a floating-point number of currency units.
    pub fn from_f64(units: f64) -> Result<Self, AmountError> {
        if !units.is_finite() {
            return Err(AmountError::NotFinite);
        }
        let cents = (units * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return Err(AmountError::Overflow);
        }
        Ok(Self(cents as i64))
    }

    /// The amount as a floating-point number of currency units.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Errors parsing an [`Amount`].
#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
pub enum AmountError {
    #[display("amount is empty")]
    Empty,

    #[display("invalid amount: {_0:?}")]
    Invalid(#[error(not(source))] String),

    #[display("amount is too large")]
    Overflow,

    #[display("amount is not a finite number")]
    NotFinite,
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parse an amount written by a person or by the backend.
    ///
    /// Whitespace (including non-breaking spaces used as thousands
    /// separators) and the `€` sign are ignored. When both `.` and `,` appear,
    /// whichever comes last is the decimal separator and the other is a
    /// thousands separator; a lone `,` is a decimal separator.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let cleaned = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '€')
            .collect::<String>();
        if cleaned.is_empty() {
            return Err(AmountError::Empty);
        }

        let decimal = match (cleaned.rfind('.'), cleaned.rfind(',')) {
            (Some(dot), Some(comma)) if comma > dot => ',',
            (None, Some(_)) => ',',
            _ => '.',
        };
        let thousands = if decimal == '.' { ',' } else { '.' };
        let normalized = cleaned
            .chars()
            .filter(|c| *c != thousands)
            .map(|c| if c == decimal { '.' } else { c })
            .collect::<String>();

        let (negative, digits) = match normalized.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, normalized.strip_prefix('+').unwrap_or(&normalized)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction)
        {
            return Err(AmountError::Invalid(raw.to_string()));
        }

        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| AmountError::Overflow)?
        };
        let mut places = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = places.next().unwrap_or(0);
        let hundredths = places.next().unwrap_or(0);
        let round_up = places.next().is_some_and(|digit| digit >= 5);

        let cents = whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or(AmountError::Overflow)?;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawAmount {
    fn parse(self) -> Result<Amount, AmountError> {
        match self {
            RawAmount::Integer(units) => units
                .checked_mul(100)
                .map(Amount)
                .ok_or(AmountError::Overflow),
            RawAmount::Float(units) => Amount::from_f64(units),
            RawAmount::Text(text) => text.parse(),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawAmount::deserialize(deserializer)?
            .parse()
            .map_err(D::Error::custom)
    }
}

/// Decode an optional amount, treating `null` and blank strings as absent.
pub(crate) fn optional<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawAmount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawAmount::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(D::Error::custom),
    }
}

/// Decode an amount, treating `null` and blank strings as zero.
pub(crate) fn or_zero<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    optional(deserializer).map(Option::unwrap_or_default)
}

//! Retention limit parsing and the minimum-size safety check.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest limit accepted without an explicit override (1 MiB).
pub const MINIMUM_LIMIT_BYTES: u64 = 1024 * 1024;

/// Maximum total size, in bytes, the kept file set may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RetentionLimit(u64);

impl RetentionLimit {
    /// Create a limit from a raw byte count.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Parse a human size string such as `100`, `512k`, `2m`, `10G` or `1t`.
    ///
    /// The optional unit suffix is a single letter, case-insensitive:
    /// `b` (bytes), `k`, `m`, `g`, `t` (powers of 1024).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, the numeric part is missing
    /// or not a plain decimal number, the suffix is unknown, or the scaled
    /// value does not fit in a `u64`.
    pub fn parse(input: &str) -> Result<Self, LimitError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LimitError::Empty);
        }

        let (digits, multiplier) = match trimmed.char_indices().last() {
            Some((idx, c)) if c.is_ascii_alphabetic() => {
                (&trimmed[..idx], unit_multiplier(c, trimmed)?)
            }
            _ => (trimmed, 1),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LimitError::Malformed(input.to_string()));
        }

        let value = digits
            .parse::<u64>()
            .map_err(|_| LimitError::Overflow(input.to_string()))?;

        value
            .checked_mul(multiplier)
            .map(Self)
            .ok_or_else(|| LimitError::Overflow(input.to_string()))
    }

    /// Limit in bytes.
    pub const fn bytes(&self) -> u64 {
        self.0
    }

    /// Apply the minimum-size guard.
    ///
    /// Limits below [`MINIMUM_LIMIT_BYTES`] are rejected unless `force` is set.
    pub fn ensure_minimum(self, force: bool) -> Result<Self, LimitError> {
        if !force && self.0 < MINIMUM_LIMIT_BYTES {
            return Err(LimitError::BelowMinimum {
                limit: self.0,
                minimum: MINIMUM_LIMIT_BYTES,
            });
        }
        Ok(self)
    }
}

fn unit_multiplier(unit: char, input: &str) -> Result<u64, LimitError> {
    match unit.to_ascii_lowercase() {
        'b' => Ok(1),
        'k' => Ok(1 << 10),
        'm' => Ok(1 << 20),
        'g' => Ok(1 << 30),
        't' => Ok(1 << 40),
        other => Err(LimitError::UnknownUnit {
            unit: other,
            input: input.to_string(),
        }),
    }
}

impl FromStr for RetentionLimit {
    type Err = LimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RetentionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

/// Errors produced while parsing or validating a retention limit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// No value was given.
    #[error("size limit is empty")]
    Empty,

    /// The value is not `<digits>[unit]`.
    #[error("malformed size limit '{0}', expected <N>[b|k|m|g|t]")]
    Malformed(String),

    /// The unit suffix is not one of `b`, `k`, `m`, `g`, `t`.
    #[error("unknown size unit '{unit}' in '{input}', expected one of b, k, m, g, t")]
    UnknownUnit { unit: char, input: String },

    /// The scaled value does not fit in 64 bits.
    #[error("size limit '{0}' is too large")]
    Overflow(String),

    /// The limit is below the safety minimum and no override was given.
    #[error(
        "size limit of {limit} bytes is below the minimum of {minimum} bytes, use --force to override"
    )]
    BelowMinimum { limit: u64, minimum: u64 },
}

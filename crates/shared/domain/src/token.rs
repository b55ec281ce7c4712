//! Token lifetime notation (`3600`, `90s`, `15m`, `1h`, `7d`).

use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_TOKEN_LIFETIME, SECONDS_PER_HOUR};
use crate::error::DomainError;

/// A configured token lifetime.
///
/// Keeps the original notation, which is echoed back to clients as
/// `expiresIn`, next to the parsed number of seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLifetime {
    notation: String,
    seconds: i64,
}

impl TokenLifetime {
    /// Lifetime in seconds
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// The notation the lifetime was configured with
    pub fn as_str(&self) -> &str {
        &self.notation
    }
}

impl Default for TokenLifetime {
    fn default() -> Self {
        Self {
            notation: DEFAULT_TOKEN_LIFETIME.to_string(),
            seconds: SECONDS_PER_HOUR,
        }
    }
}

impl FromStr for TokenLifetime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let notation = s.trim();
        let invalid = || DomainError::validation(format!("Invalid token lifetime: {:?}", s));

        let split = notation
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(notation.len());
        let (digits, unit) = notation.split_at(split);
        let amount: i64 = digits.parse().map_err(|_| invalid())?;

        let multiplier = match unit {
            "" | "s" => 1,
            "m" => 60,
            "h" => SECONDS_PER_HOUR,
            "d" => 24 * SECONDS_PER_HOUR,
            _ => return Err(invalid()),
        };

        let seconds = amount.checked_mul(multiplier).ok_or_else(invalid)?;
        if seconds == 0 {
            return Err(invalid());
        }

        Ok(Self {
            notation: notation.to_string(),
            seconds,
        })
    }
}

impl fmt::Display for TokenLifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation)
    }
}

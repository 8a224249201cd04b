//! Indian mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits and separators.
    #[error("phone number may only contain digits")]
    InvalidCharacter,
    /// The digit count is wrong.
    #[error("phone number must have {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
}

/// A 10-digit phone number.
///
/// Spaces, dashes and a leading `+91` country code are stripped.
///
/// ```
/// use esep_core::PhoneNumber;
///
/// assert_eq!(PhoneNumber::parse("98765 43210").unwrap().as_str(), "9876543210");
/// assert_eq!(PhoneNumber::parse("+91-9876543210").unwrap().as_str(), "9876543210");
/// assert!(PhoneNumber::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits in a local number.
    pub const DIGITS: usize = 10;

    /// Parse and normalise a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains letters, or does not
    /// have exactly ten digits once separators and the country code are removed.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let s = s.strip_prefix("+91").unwrap_or(s);
        let mut digits = String::with_capacity(Self::DIGITS);
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(PhoneError::WrongLength {
                expected: Self::DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the normalised digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the number and returns its digits.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_separators() {
        assert_eq!(
            PhoneNumber::parse("987-654-3210").map(PhoneNumber::into_inner),
            Ok("9876543210".to_string())
        );
    }

    #[test]
    fn test_rejects_letters() {
        assert_eq!(
            PhoneNumber::parse("98765abcde"),
            Err(PhoneError::InvalidCharacter)
        );
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(
            PhoneNumber::parse("98765432100"),
            Err(PhoneError::WrongLength { expected: 10 })
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(PhoneNumber::parse("  "), Err(PhoneError::Empty));
    }
}

//! Registration fees and discount display arithmetic.
//!
//! Fees are rupee amounts held as [`Decimal`] so that `NUMERIC(10,2)` values
//! from the database round-trip exactly.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Fee`] from form input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeError {
    /// The input string is empty.
    #[error("fee cannot be empty")]
    Empty,
    /// The input is not a number.
    #[error("fee must be a number")]
    NotANumber,
    /// The input is below zero.
    #[error("fee cannot be negative")]
    Negative,
}

/// A fee amount in rupees.
///
/// ```
/// use esep_core::Fee;
///
/// let fee = Fee::parse("250.00").unwrap();
/// assert_eq!(fee.to_string(), "250");
/// assert!(Fee::parse("").is_err());
/// assert!(Fee::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Fee(Decimal);

impl Fee {
    /// A zero fee.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount without validation.
    ///
    /// Used for values read back from the database, where the amount has
    /// already been validated on the way in.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a fee from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not numeric, or negative.
    pub fn parse(s: &str) -> Result<Self, FeeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FeeError::Empty);
        }

        let amount: Decimal = s.parse().map_err(|_| FeeError::NotANumber)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(FeeError::Negative);
        }

        Ok(Self(amount))
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true when the fee is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Fee {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Listed and discounted fee for a category.
///
/// `offer <= actual` is expected but not enforced; a larger offer simply
/// yields a negative discount and negative savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    /// The regular (listed) fee.
    pub actual: Fee,
    /// The discounted fee actually charged.
    pub offer: Fee,
}

impl Pricing {
    /// Create a pricing pair.
    #[must_use]
    pub const fn new(actual: Fee, offer: Fee) -> Self {
        Self { actual, offer }
    }

    /// Whole-number discount percentage shown on catalog cards.
    ///
    /// `round(((actual - offer) / actual) * 100)` with halves rounded toward
    /// positive infinity; `0` when the actual fee is zero.
    ///
    /// ```
    /// use esep_core::{Fee, Pricing};
    ///
    /// let pricing = Pricing::new(Fee::parse("500").unwrap(), Fee::parse("250").unwrap());
    /// assert_eq!(pricing.discount_percent(), 50);
    /// ```
    #[must_use]
    pub fn discount_percent(&self) -> i64 {
        let actual = self.actual.amount();
        if actual <= Decimal::ZERO {
            return 0;
        }

        let ratio = (actual - self.offer.amount()) / actual * Decimal::ONE_HUNDRED;
        (ratio + Decimal::new(5, 1)).floor().to_i64().unwrap_or(0)
    }

    /// Amount saved by paying the offer fee instead of the actual fee.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        self.actual.amount() - self.offer.amount()
    }

    /// Savings formatted for display (`"250"`, `"99.5"`).
    #[must_use]
    pub fn savings_display(&self) -> String {
        self.savings().normalize().to_string()
    }

    /// True when the category costs nothing to register.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.offer.is_zero()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pricing(actual: &str, offer: &str) -> Pricing {
        Pricing::new(Fee::parse(actual).unwrap(), Fee::parse(offer).unwrap())
    }

    #[test]
    fn test_trade_license_example() {
        let p = pricing("500", "250");
        assert_eq!(p.discount_percent(), 50);
        assert_eq!(p.savings_display(), "250");
        assert!(!p.is_free());
    }

    #[test]
    fn test_discount_zero_actual_fee() {
        assert_eq!(pricing("0", "0").discount_percent(), 0);
        assert_eq!(pricing("0.00", "10").discount_percent(), 0);
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 1/8 off = 12.5% -> 13
        assert_eq!(pricing("8", "7").discount_percent(), 13);
        // 1/3 off = 33.33% -> 33
        assert_eq!(pricing("300", "200").discount_percent(), 33);
        // 2/3 off = 66.67% -> 67
        assert_eq!(pricing("300", "100").discount_percent(), 67);
    }

    #[test]
    fn test_discount_free_offer_is_hundred_percent() {
        let p = pricing("1200", "0");
        assert_eq!(p.discount_percent(), 100);
        assert!(p.is_free());
    }

    #[test]
    fn test_offer_above_actual_goes_negative() {
        let p = pricing("100", "150");
        assert_eq!(p.discount_percent(), -50);
        assert_eq!(p.savings_display(), "-50");
    }

    #[test]
    fn test_fee_display_drops_trailing_zeros() {
        assert_eq!(Fee::parse("250.00").unwrap().to_string(), "250");
        assert_eq!(Fee::parse("99.50").unwrap().to_string(), "99.5");
        assert_eq!(Fee::new(Decimal::new(10000, 2)).to_string(), "100");
    }

    #[test]
    fn test_fee_parse_errors() {
        assert_eq!(Fee::parse("   "), Err(FeeError::Empty));
        assert_eq!(Fee::parse("abc"), Err(FeeError::NotANumber));
        assert_eq!(Fee::parse("-5"), Err(FeeError::Negative));
        assert!(Fee::parse("0").unwrap().is_zero());
    }
}

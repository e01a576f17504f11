// Domain type definitions shared by the promotion engine
// Discount modes as stored per promotion-item link, and the tagged form the engine computes with

use crate::engine::error::{EngineError, EngineResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Mode of discount computation configured on a promotion-item link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percentage of the item price (e.g., 10 = 10% off)
    Percentage,

    /// Fixed amount subtracted from the item price (e.g., 5.00 = R$5 off)
    Fixed,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            _ => Err(format!("Invalid discount type: {}", s)),
        }
    }
}

/// Discount attached to a promotion-item link
///
/// The database keeps two nullable columns; the engine only ever sees this
/// tagged form so "nothing configured yet" is a case of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discount {
    NoDiscount,
    Percentage(Decimal),
    Fixed(Decimal),
}

impl Discount {
    /// Build a discount from the nullable `discount_type` / `discount_value` columns
    ///
    /// A missing type, a missing value or a zero value all mean "no discount".
    /// Negative values are rejected.
    pub fn from_parts(
        discount_type: Option<DiscountType>,
        discount_value: Option<Decimal>,
    ) -> EngineResult<Self> {
        if let Some(value) = discount_value {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(EngineError::invalid(format!(
                    "discount value must be non-negative, got {}",
                    value
                )));
            }
        }

        let discount = match (discount_type, discount_value) {
            (Some(_), Some(value)) if value.is_zero() => Discount::NoDiscount,
            (Some(DiscountType::Percentage), Some(value)) => Discount::Percentage(value),
            (Some(DiscountType::Fixed), Some(value)) => Discount::Fixed(value),
            _ => Discount::NoDiscount,
        };

        Ok(discount)
    }

    /// Whether applying this discount can change a price
    pub fn is_configured(&self) -> bool {
        !matches!(self, Discount::NoDiscount)
    }

    /// Split back into the column representation
    pub fn into_parts(self) -> (Option<DiscountType>, Option<Decimal>) {
        match self {
            Discount::NoDiscount => (None, None),
            Discount::Percentage(value) => (Some(DiscountType::Percentage), Some(value)),
            Discount::Fixed(value) => (Some(DiscountType::Fixed), Some(value)),
        }
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discount::NoDiscount => write!(f, "no discount"),
            Discount::Percentage(value) => write!(f, "{}% off", value),
            Discount::Fixed(value) => write!(f, "{} off", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_discount_type_display() {
        assert_eq!(DiscountType::Percentage.to_string(), "percentage");
        assert_eq!(DiscountType::Fixed.to_string(), "fixed");
    }

    #[test]
    fn test_discount_type_from_str() {
        assert_eq!(DiscountType::from_str("percentage").unwrap(), DiscountType::Percentage);
        assert_eq!(DiscountType::from_str("fixed").unwrap(), DiscountType::Fixed);
        assert!(DiscountType::from_str("fixed_amount").is_err());
    }

    #[test]
    fn test_discount_type_serde() {
        let json = serde_json::to_string(&DiscountType::Fixed).unwrap();
        assert_eq!(json, "\"fixed\"");

        let parsed: DiscountType = serde_json::from_str("\"percentage\"").unwrap();
        assert_eq!(parsed, DiscountType::Percentage);
    }

    #[test]
    fn test_from_parts_missing_pieces_mean_no_discount() {
        assert_eq!(Discount::from_parts(None, None).unwrap(), Discount::NoDiscount);
        assert_eq!(
            Discount::from_parts(None, Some(dec!(10))).unwrap(),
            Discount::NoDiscount
        );
        assert_eq!(
            Discount::from_parts(Some(DiscountType::Fixed), None).unwrap(),
            Discount::NoDiscount
        );
        assert_eq!(
            Discount::from_parts(Some(DiscountType::Percentage), Some(dec!(0))).unwrap(),
            Discount::NoDiscount
        );
    }

    #[test]
    fn test_from_parts_configured() {
        assert_eq!(
            Discount::from_parts(Some(DiscountType::Percentage), Some(dec!(15))).unwrap(),
            Discount::Percentage(dec!(15))
        );
        assert_eq!(
            Discount::from_parts(Some(DiscountType::Fixed), Some(dec!(2.50))).unwrap(),
            Discount::Fixed(dec!(2.50))
        );
    }

    #[test]
    fn test_from_parts_rejects_negative_value() {
        let result = Discount::from_parts(Some(DiscountType::Fixed), Some(dec!(-1)));
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));

        // Even without a type a negative value is corrupt input
        let result = Discount::from_parts(None, Some(dec!(-0.01)));
        assert!(result.is_err());
    }

    #[test]
    fn test_into_parts_round_trip() {
        let discount = Discount::Percentage(dec!(20));
        let (kind, value) = discount.into_parts();
        assert_eq!(Discount::from_parts(kind, value).unwrap(), discount);
        assert_eq!(Discount::NoDiscount.into_parts(), (None, None));
    }
}

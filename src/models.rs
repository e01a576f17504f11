use crate::engine::{Discount, DiscountType, EngineResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Badge shown on a promotion when none was configured
pub const DEFAULT_BADGE_TEXT: &str = "Promoção";

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on the
/// nullable columns of update payloads.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Grouping of menu items, ordered by `display_order`
///
/// `item_count` is derived from the menu_items table, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Pizzas")]
    pub name: String,
    #[schema(example = "Wood-fired pizzas")]
    pub description: Option<String>,
    #[schema(example = 1)]
    pub display_order: i32,
    #[schema(example = 8)]
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sellable dish belonging to exactly one category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub category_id: Uuid,
    #[schema(example = "Margherita")]
    pub name: String,
    #[schema(example = "Tomato, mozzarella and basil")]
    pub description: Option<String>,
    /// Base price, never negative
    #[schema(value_type = String, example = "42.90")]
    pub price: Decimal,
    pub image_url: Option<String>,
    #[schema(example = true)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A time-bounded marketing campaign
///
/// Dates are calendar days in the restaurant timezone; both bounds are
/// inclusive and either may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Promotion {
    pub id: Uuid,
    #[schema(example = "Pizza Tuesday")]
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[schema(example = "Promoção")]
    pub badge_text: String,
    #[schema(example = true)]
    pub is_active: bool,
    #[schema(example = "2024-06-01")]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-06-30")]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Link between a promotion and a menu item carrying the per-item discount
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PromotionItem {
    pub id: Uuid,
    pub promotion_id: Uuid,
    pub menu_item_id: Uuid,
    pub discount_type: Option<DiscountType>,
    #[schema(value_type = Option<String>, example = "10")]
    pub discount_value: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl PromotionItem {
    /// Tagged discount configured on this link
    pub fn discount(&self) -> EngineResult<Discount> {
        Discount::from_parts(self.discount_type, self.discount_value)
    }
}

/// A single impression of a promotion; append-only
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PromotionView {
    pub id: Uuid,
    pub promotion_id: Uuid,
    pub viewed_at: DateTime<Utc>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders shared by unit tests across modules

    use super::*;

    pub fn promotion(title: &str, is_active: bool) -> Promotion {
        Promotion {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            image_url: None,
            badge_text: DEFAULT_BADGE_TEXT.to_string(),
            is_active,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn menu_item(category_id: Uuid, name: &str, price: Decimal) -> MenuItem {
        MenuItem {
            id: Uuid::new_v4(),
            category_id,
            name: name.to_string(),
            description: None,
            price,
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn category(name: &str, display_order: i32) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            display_order,
            item_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn link(
        promotion_id: Uuid,
        menu_item_id: Uuid,
        discount_type: Option<DiscountType>,
        discount_value: Option<Decimal>,
    ) -> PromotionItem {
        PromotionItem {
            id: Uuid::new_v4(),
            promotion_id,
            menu_item_id,
            discount_type,
            discount_value,
            created_at: Utc::now(),
        }
    }

    pub fn view(promotion_id: Uuid) -> PromotionView {
        PromotionView {
            id: Uuid::new_v4(),
            promotion_id,
            viewed_at: Utc::now(),
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_promotion_serialization() {
        let mut promotion = fixtures::promotion("Pizza Tuesday", true);
        promotion.start_date = NaiveDate::from_ymd_opt(2024, 6, 1);

        let json = serde_json::to_string(&promotion).expect("Failed to serialize Promotion");

        assert!(json.contains("\"title\":\"Pizza Tuesday\""));
        assert!(json.contains("\"badge_text\":\"Promoção\""));
        assert!(json.contains("\"start_date\":\"2024-06-01\""));
        assert!(json.contains("\"end_date\":null"));
        assert!(json.contains("\"is_active\":true"));
    }

    #[test]
    fn test_menu_item_price_serializes_as_decimal_string() {
        let item = fixtures::menu_item(Uuid::new_v4(), "Margherita", dec!(42.90));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["price"], "42.90");
    }

    #[test]
    fn test_promotion_item_discount() {
        let link = fixtures::link(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some(DiscountType::Percentage),
            Some(dec!(10)),
        );
        assert_eq!(link.discount().unwrap(), Discount::Percentage(dec!(10)));

        let link = fixtures::link(Uuid::new_v4(), Uuid::new_v4(), None, None);
        assert_eq!(link.discount().unwrap(), Discount::NoDiscount);
    }
}

// Catalog request/response DTOs

use crate::engine::Offer;
use crate::models::{double_option, Category, MenuItem};
use crate::validation::{validate_non_negative_price, validate_not_blank};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Used for POST /api/admin/categories
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    #[schema(example = "Pizzas")]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to 0
    #[schema(example = 1)]
    pub display_order: Option<i32>,
}

/// Used for PUT /api/admin/categories/{id}
///
/// Omitted fields keep their value; `null` clears the description.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub display_order: Option<i32>,
}

/// Used for POST /api/admin/menu-items
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMenuItem {
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    #[schema(example = "Margherita")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_non_negative_price")]
    #[schema(value_type = String, example = "42.90")]
    pub price: Decimal,
    #[validate(url)]
    pub image_url: Option<String>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Used for PUT /api/admin/menu-items/{id}
///
/// Omitted fields keep their value; `null` clears the description or image.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuItem {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(custom = "validate_non_negative_price")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(url)]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Filters for GET /api/admin/menu-items
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuItemQuery {
    /// Only items with is_active = true
    pub active_only: Option<bool>,
    pub category_id: Option<Uuid>,
    /// Case-insensitive match on name or description
    pub search: Option<String>,
}

/// Query for GET /api/public/menu
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuQuery {
    pub search: Option<String>,
}

/// Menu card: an item with its best live offer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MenuItemCard {
    #[serde(flatten)]
    pub item: MenuItem,
    pub offer: Option<Offer>,
}

/// One category of the public menu with its active items
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItemCard>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicMenu {
    pub sections: Vec<MenuSection>,
}

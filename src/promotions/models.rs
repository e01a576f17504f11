// Promotion request/response DTOs

use crate::engine::{CountdownView, DiscountType};
use crate::models::{double_option, Promotion};
use crate::validation::validate_not_blank;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Used for POST /api/admin/promotions
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePromotion {
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    #[schema(example = "Pizza Tuesday")]
    pub title: String,
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    /// Defaults to "Promoção"
    #[validate(length(min = 1, max = 50))]
    pub badge_text: Option<String>,
    /// Defaults to true
    pub is_active: Option<bool>,
    #[schema(example = "2024-06-01")]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-06-30")]
    pub end_date: Option<NaiveDate>,
}

/// Used for PUT /api/admin/promotions/{id}
///
/// Omitted fields keep their value; `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePromotion {
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(url)]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    #[validate(length(min = 1, max = 50))]
    pub badge_text: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "2024-06-01")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "2024-06-30")]
    pub end_date: Option<Option<NaiveDate>>,
}

/// Used for POST /api/admin/promotions/{id}/items
///
/// New links default to a 0% percentage discount (badge only).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LinkItemRequest {
    pub menu_item_id: Uuid,
    pub discount_type: Option<DiscountType>,
    #[schema(value_type = Option<String>, example = "10")]
    pub discount_value: Option<Decimal>,
}

/// Used for PUT /api/admin/promotions/{id}/items/{menu_item_id}
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateLinkRequest {
    pub discount_type: DiscountType,
    #[schema(value_type = String, example = "5.00")]
    pub discount_value: Decimal,
}

/// Filters for GET /api/admin/promotions
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PromotionQuery {
    /// Only promotions flagged is_active (dates are not checked)
    pub active_only: Option<bool>,
}

/// Query for GET /api/public/promotions/banner
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BannerQuery {
    /// Zero-based index requested by the client, wrapped into range
    pub position: Option<usize>,
}

/// Promotion as shown publicly, with its countdown when it has an end date
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromotionCard {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub countdown: Option<CountdownView>,
}

/// Banner state for one client position
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BannerResponse {
    pub promotion: Option<PromotionCard>,
    /// Zero-based index of `promotion`
    pub index: Option<usize>,
    /// Position indicator, e.g. "2/5"
    pub position: Option<String>,
    pub total: usize,
    pub next_index: Option<usize>,
    pub prev_index: Option<usize>,
    pub show_navigation: bool,
    /// Auto-advance period; absent when a single promotion is shown
    pub auto_advance_secs: Option<u64>,
}

/// Promotion linked to a given menu item, as shown in the item editor
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemPromotion {
    pub link_id: Uuid,
    pub promotion_id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Active and inside its window today
    pub eligible: bool,
    pub discount_type: Option<DiscountType>,
    #[schema(value_type = Option<String>)]
    pub discount_value: Option<Decimal>,
    #[schema(value_type = String)]
    pub discounted_price: Decimal,
}

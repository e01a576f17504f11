// Restaurant settings models and DTOs

use crate::engine::hours::{is_open_at, WeeklySchedule};
use crate::models::double_option;
use crate::validation::{validate_hex_color, validate_not_blank, validate_schedule};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Singleton row holding the restaurant's identity and opening hours
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RestaurantSettings {
    pub id: Uuid,
    #[schema(example = "Cantina da Nonna")]
    pub name: String,
    pub logo_url: Option<String>,
    #[schema(example = "#e63946")]
    pub primary_color: String,
    #[schema(example = "#1d3557")]
    pub secondary_color: String,
    #[schema(value_type = Option<WeeklySchedule>)]
    pub opening_hours: Option<Json<WeeklySchedule>>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
    pub instagram: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RestaurantSettings {
    pub fn schedule(&self) -> Option<&WeeklySchedule> {
        self.opening_hours.as_ref().map(|hours| &hours.0)
    }
}

/// Used for PUT /api/admin/settings
///
/// Omitted fields keep their value; `null` clears the logo or a contact field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSettings {
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(url)]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    #[validate(custom = "validate_hex_color")]
    #[schema(example = "#e63946")]
    pub primary_color: Option<String>,
    #[validate(custom = "validate_hex_color")]
    #[schema(example = "#1d3557")]
    pub secondary_color: Option<String>,
    #[validate(custom = "validate_schedule")]
    pub opening_hours: Option<WeeklySchedule>,
    #[validate(length(max = 30))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[validate(length(max = 30))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub whatsapp: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[validate(length(max = 100))]
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub instagram: Option<Option<String>>,
}

/// Settings as served publicly, with the derived open/closed flag
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicSettings {
    #[serde(flatten)]
    pub settings: RestaurantSettings,
    pub is_open: bool,
}

impl PublicSettings {
    /// `now` is the restaurant's local wall-clock time
    ///
    /// A schedule that fails to parse is reported as closed.
    pub fn new(settings: RestaurantSettings, now: NaiveDateTime) -> Self {
        let is_open = match is_open_at(settings.schedule(), now) {
            Ok(open) => open,
            Err(e) => {
                tracing::warn!("Stored opening hours are invalid: {}", e);
                false
            }
        };

        Self { settings, is_open }
    }
}

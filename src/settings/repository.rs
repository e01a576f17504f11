// Database repository for the restaurant settings row

use crate::error::ApiError;
use crate::settings::models::{RestaurantSettings, UpdateSettings};
use sqlx::types::Json;
use sqlx::PgPool;

const SETTINGS_COLUMNS: &str = "id, name, logo_url, primary_color, secondary_color, opening_hours, \
                                phone, whatsapp, address, instagram, created_at, updated_at";

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The settings row seeded by the migrations
    pub async fn get(&self) -> Result<RestaurantSettings, ApiError> {
        let sql = format!(
            "SELECT {} FROM restaurant_settings ORDER BY created_at LIMIT 1",
            SETTINGS_COLUMNS
        );
        let settings = sqlx::query_as::<_, RestaurantSettings>(&sql)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Settings", "restaurant"))?;

        Ok(settings)
    }

    pub async fn update(&self, payload: &UpdateSettings) -> Result<RestaurantSettings, ApiError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {} FROM restaurant_settings ORDER BY created_at LIMIT 1 FOR UPDATE",
            SETTINGS_COLUMNS
        );
        let existing = sqlx::query_as::<_, RestaurantSettings>(&select)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ApiError::not_found("Settings", "restaurant"))?;

        let opening_hours = payload
            .opening_hours
            .clone()
            .map(Json)
            .or(existing.opening_hours);

        let update = format!(
            r#"
            UPDATE restaurant_settings
            SET name = $1, logo_url = $2, primary_color = $3, secondary_color = $4,
                opening_hours = $5, phone = $6, whatsapp = $7, address = $8,
                instagram = $9, updated_at = NOW()
            WHERE id = $10
            RETURNING {}
            "#,
            SETTINGS_COLUMNS
        );
        let settings = sqlx::query_as::<_, RestaurantSettings>(&update)
            .bind(payload.name.as_deref().map(str::trim).unwrap_or(&existing.name))
            .bind(payload.logo_url.clone().unwrap_or(existing.logo_url))
            .bind(payload.primary_color.as_ref().unwrap_or(&existing.primary_color))
            .bind(payload.secondary_color.as_ref().unwrap_or(&existing.secondary_color))
            .bind(opening_hours)
            .bind(payload.phone.clone().unwrap_or(existing.phone))
            .bind(payload.whatsapp.clone().unwrap_or(existing.whatsapp))
            .bind(payload.address.clone().unwrap_or(existing.address))
            .bind(payload.instagram.clone().unwrap_or(existing.instagram))
            .bind(existing.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Updated restaurant settings");
        Ok(settings)
    }
}

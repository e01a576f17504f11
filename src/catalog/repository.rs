// Database repository for categories and menu items
//
// Deletes cascade explicitly inside one transaction: promotion links first,
// then items, then the category.

use crate::catalog::models::{
    CreateCategory, CreateMenuItem, MenuItemQuery, UpdateCategory, UpdateMenuItem,
};
use crate::error::ApiError;
use crate::models::{Category, MenuItem};
use sqlx::PgPool;
use uuid::Uuid;

const CATEGORY_SELECT: &str = r#"
    SELECT c.id, c.name, c.description, c.display_order, c.created_at, c.updated_at,
           COUNT(m.id) AS item_count
    FROM categories c
    LEFT JOIN menu_items m ON m.category_id = c.id
"#;

const MENU_ITEM_COLUMNS: &str =
    "id, category_id, name, description, price, image_url, is_active, created_at, updated_at";

/// Turn free text into an ILIKE pattern, escaping the wildcards it may contain
pub fn like_pattern(search: &str) -> Option<String> {
    let trimmed = search.trim();
    if trimmed.is_empty() {
        return None;
    }

    let escaped = trimmed
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

/// Repository for catalog operations
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All categories by display order, each with its item count
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let sql = format!(
            "{} GROUP BY c.id ORDER BY c.display_order, c.name",
            CATEGORY_SELECT
        );
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Retrieved {} categories", categories.len());
        Ok(categories)
    }

    pub async fn find_category(&self, id: Uuid) -> Result<Option<Category>, ApiError> {
        let sql = format!("{} WHERE c.id = $1 GROUP BY c.id", CATEGORY_SELECT);
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn create_category(&self, payload: &CreateCategory) -> Result<Category, ApiError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, display_order)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, display_order, created_at, updated_at, 0::BIGINT AS item_count
            "#,
        )
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(payload.display_order.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        payload: &UpdateCategory,
    ) -> Result<Category, ApiError> {
        let existing = self
            .find_category(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category", id))?;

        sqlx::query(
            r#"
            UPDATE categories
            SET name = $1, description = $2, display_order = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(payload.name.as_deref().map(str::trim).unwrap_or(&existing.name))
        .bind(payload.description.clone().unwrap_or(existing.description))
        .bind(payload.display_order.unwrap_or(existing.display_order))
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!("Updated category {}", id);
        self.find_category(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category", id))
    }

    /// Delete a category together with its items and their promotion links
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM promotion_items
            WHERE menu_item_id IN (SELECT id FROM menu_items WHERE category_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let items = sqlx::query("DELETE FROM menu_items WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping tx rolls back
            return Err(ApiError::not_found("Category", id));
        }

        tx.commit().await?;
        tracing::info!(
            "Deleted category {} and {} menu items",
            id,
            items.rows_affected()
        );
        Ok(())
    }

    /// Menu items ordered by name, optionally filtered
    pub async fn list_menu_items(&self, query: &MenuItemQuery) -> Result<Vec<MenuItem>, ApiError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM menu_items
            WHERE ($1 = FALSE OR is_active = TRUE)
              AND ($2::UUID IS NULL OR category_id = $2)
              AND ($3::TEXT IS NULL OR name ILIKE $3 OR description ILIKE $3)
            ORDER BY name
            "#,
            MENU_ITEM_COLUMNS
        );

        let items = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(query.active_only.unwrap_or(false))
            .bind(query.category_id)
            .bind(query.search.as_deref().and_then(like_pattern))
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Retrieved {} menu items", items.len());
        Ok(items)
    }

    pub async fn find_menu_item(&self, id: Uuid) -> Result<Option<MenuItem>, ApiError> {
        let sql = format!("SELECT {} FROM menu_items WHERE id = $1", MENU_ITEM_COLUMNS);
        let item = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn create_menu_item(&self, payload: &CreateMenuItem) -> Result<MenuItem, ApiError> {
        let sql = format!(
            r#"
            INSERT INTO menu_items (category_id, name, description, price, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MENU_ITEM_COLUMNS
        );

        let item = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(payload.category_id)
            .bind(payload.name.trim())
            .bind(&payload.description)
            .bind(payload.price)
            .bind(&payload.image_url)
            .bind(payload.is_active.unwrap_or(true))
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created menu item {} ({})", item.id, item.name);
        Ok(item)
    }

    pub async fn update_menu_item(
        &self,
        id: Uuid,
        payload: &UpdateMenuItem,
    ) -> Result<MenuItem, ApiError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {} FROM menu_items WHERE id = $1 FOR UPDATE",
            MENU_ITEM_COLUMNS
        );
        let existing = sqlx::query_as::<_, MenuItem>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ApiError::not_found("Menu item", id))?;

        let update = format!(
            r#"
            UPDATE menu_items
            SET category_id = $1, name = $2, description = $3, price = $4,
                image_url = $5, is_active = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            MENU_ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, MenuItem>(&update)
            .bind(payload.category_id.unwrap_or(existing.category_id))
            .bind(payload.name.as_deref().map(str::trim).unwrap_or(&existing.name))
            .bind(payload.description.clone().unwrap_or(existing.description))
            .bind(payload.price.unwrap_or(existing.price))
            .bind(payload.image_url.clone().unwrap_or(existing.image_url))
            .bind(payload.is_active.unwrap_or(existing.is_active))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Updated menu item {}", id);
        Ok(item)
    }

    /// Delete a menu item and its promotion links
    pub async fn delete_menu_item(&self, id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM promotion_items WHERE menu_item_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Menu item", id));
        }

        tx.commit().await?;
        tracing::info!("Deleted menu item {}", id);
        Ok(())
    }
}

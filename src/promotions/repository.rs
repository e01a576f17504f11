// Database repository for promotions, promotion-item links and view events

use crate::engine::{DiscountType, EngineError, EngineResult};
use crate::models::{MenuItem, Promotion, PromotionItem, PromotionView, DEFAULT_BADGE_TEXT};
use crate::promotions::models::{CreatePromotion, UpdatePromotion};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const PROMOTION_COLUMNS: &str = "id, title, description, image_url, badge_text, is_active, \
                                 start_date, end_date, created_at, updated_at";

const LINK_COLUMNS: &str =
    "id, promotion_id, menu_item_id, discount_type, discount_value, created_at";

/// Repository for promotion operations
#[derive(Clone)]
pub struct PromotionRepository {
    pool: PgPool,
}

impl PromotionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Promotions, most recent first
    pub async fn list(&self, active_only: bool) -> EngineResult<Vec<Promotion>> {
        let sql = format!(
            "SELECT {} FROM promotions WHERE ($1 = FALSE OR is_active = TRUE) ORDER BY created_at DESC",
            PROMOTION_COLUMNS
        );
        let promotions = sqlx::query_as::<_, Promotion>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Retrieved {} promotions", promotions.len());
        Ok(promotions)
    }

    pub async fn find(&self, id: Uuid) -> EngineResult<Option<Promotion>> {
        let sql = format!("SELECT {} FROM promotions WHERE id = $1", PROMOTION_COLUMNS);
        let promotion = sqlx::query_as::<_, Promotion>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(promotion)
    }

    pub async fn create(&self, payload: &CreatePromotion) -> EngineResult<Promotion> {
        let sql = format!(
            r#"
            INSERT INTO promotions (title, description, image_url, badge_text, is_active, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PROMOTION_COLUMNS
        );

        let promotion = sqlx::query_as::<_, Promotion>(&sql)
            .bind(payload.title.trim())
            .bind(&payload.description)
            .bind(&payload.image_url)
            .bind(payload.badge_text.as_deref().unwrap_or(DEFAULT_BADGE_TEXT))
            .bind(payload.is_active.unwrap_or(true))
            .bind(payload.start_date)
            .bind(payload.end_date)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created promotion {} ({})", promotion.id, promotion.title);
        Ok(promotion)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdatePromotion) -> EngineResult<Promotion> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {} FROM promotions WHERE id = $1 FOR UPDATE",
            PROMOTION_COLUMNS
        );
        let existing = sqlx::query_as::<_, Promotion>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| EngineError::not_found("Promotion", id))?;

        let update = format!(
            r#"
            UPDATE promotions
            SET title = $1, description = $2, image_url = $3, badge_text = $4,
                is_active = $5, start_date = $6, end_date = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {}
            "#,
            PROMOTION_COLUMNS
        );
        let promotion = sqlx::query_as::<_, Promotion>(&update)
            .bind(payload.title.as_deref().map(str::trim).unwrap_or(&existing.title))
            .bind(payload.description.clone().unwrap_or(existing.description))
            .bind(payload.image_url.clone().unwrap_or(existing.image_url))
            .bind(payload.badge_text.as_ref().unwrap_or(&existing.badge_text))
            .bind(payload.is_active.unwrap_or(existing.is_active))
            .bind(payload.start_date.unwrap_or(existing.start_date))
            .bind(payload.end_date.unwrap_or(existing.end_date))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Updated promotion {}", id);
        Ok(promotion)
    }

    /// Delete a promotion with its item links and view events
    pub async fn delete(&self, id: Uuid) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM promotion_items WHERE promotion_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM promotion_views WHERE promotion_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::not_found("Promotion", id));
        }

        tx.commit().await?;
        tracing::info!("Deleted promotion {}", id);
        Ok(())
    }

    /// Every promotion-item link
    pub async fn list_links(&self) -> EngineResult<Vec<PromotionItem>> {
        let sql = format!("SELECT {} FROM promotion_items ORDER BY created_at", LINK_COLUMNS);
        let links = sqlx::query_as::<_, PromotionItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(links)
    }

    pub async fn links_for_promotion(&self, promotion_id: Uuid) -> EngineResult<Vec<PromotionItem>> {
        let sql = format!(
            "SELECT {} FROM promotion_items WHERE promotion_id = $1 ORDER BY created_at",
            LINK_COLUMNS
        );
        let links = sqlx::query_as::<_, PromotionItem>(&sql)
            .bind(promotion_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(links)
    }

    pub async fn links_for_item(&self, menu_item_id: Uuid) -> EngineResult<Vec<PromotionItem>> {
        let sql = format!(
            "SELECT {} FROM promotion_items WHERE menu_item_id = $1 ORDER BY created_at",
            LINK_COLUMNS
        );
        let links = sqlx::query_as::<_, PromotionItem>(&sql)
            .bind(menu_item_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(links)
    }

    /// Menu items linked to a promotion
    pub async fn items_for_promotion(&self, promotion_id: Uuid) -> EngineResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT m.id, m.category_id, m.name, m.description, m.price, m.image_url,
                   m.is_active, m.created_at, m.updated_at
            FROM menu_items m
            JOIN promotion_items pi ON pi.menu_item_id = m.id
            WHERE pi.promotion_id = $1
            "#,
        )
        .bind(promotion_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn find_menu_item(&self, id: Uuid) -> EngineResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, category_id, name, description, price, image_url, is_active, created_at, updated_at
            FROM menu_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Link an item to a promotion; a duplicate pair is a unique violation
    pub async fn link_item(
        &self,
        promotion_id: Uuid,
        menu_item_id: Uuid,
        discount_type: DiscountType,
        discount_value: Decimal,
    ) -> EngineResult<PromotionItem> {
        let sql = format!(
            r#"
            INSERT INTO promotion_items (promotion_id, menu_item_id, discount_type, discount_value)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            LINK_COLUMNS
        );
        let link = sqlx::query_as::<_, PromotionItem>(&sql)
            .bind(promotion_id)
            .bind(menu_item_id)
            .bind(discount_type)
            .bind(discount_value)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Linked menu item {} to promotion {}", menu_item_id, promotion_id);
        Ok(link)
    }

    pub async fn update_link(
        &self,
        promotion_id: Uuid,
        menu_item_id: Uuid,
        discount_type: DiscountType,
        discount_value: Decimal,
    ) -> EngineResult<Option<PromotionItem>> {
        let sql = format!(
            r#"
            UPDATE promotion_items
            SET discount_type = $1, discount_value = $2
            WHERE promotion_id = $3 AND menu_item_id = $4
            RETURNING {}
            "#,
            LINK_COLUMNS
        );
        let link = sqlx::query_as::<_, PromotionItem>(&sql)
            .bind(discount_type)
            .bind(discount_value)
            .bind(promotion_id)
            .bind(menu_item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(link)
    }

    /// Remove a link; false when there was none
    pub async fn unlink(&self, promotion_id: Uuid, menu_item_id: Uuid) -> EngineResult<bool> {
        let result = sqlx::query(
            "DELETE FROM promotion_items WHERE promotion_id = $1 AND menu_item_id = $2",
        )
        .bind(promotion_id)
        .bind(menu_item_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a view event
    pub async fn record_view(
        &self,
        promotion_id: Uuid,
        user_agent: Option<&str>,
    ) -> EngineResult<PromotionView> {
        let view = sqlx::query_as::<_, PromotionView>(
            r#"
            INSERT INTO promotion_views (promotion_id, user_agent)
            VALUES ($1, $2)
            RETURNING id, promotion_id, viewed_at, user_agent
            "#,
        )
        .bind(promotion_id)
        .bind(user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(view)
    }

    pub async fn list_views(&self) -> EngineResult<Vec<PromotionView>> {
        let views = sqlx::query_as::<_, PromotionView>(
            "SELECT id, promotion_id, viewed_at, user_agent FROM promotion_views",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repository() -> PromotionRepository {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        let pool = crate::db::create_pool(&url).await.unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        PromotionRepository::new(pool)
    }

    fn new_promotion(title: &str) -> CreatePromotion {
        CreatePromotion {
            title: title.to_string(),
            description: None,
            image_url: None,
            badge_text: None,
            is_active: None,
            start_date: None,
            end_date: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_create_uses_default_badge() {
        let repo = test_repository().await;
        let promotion = repo.create(&new_promotion("Default badge")).await.unwrap();

        assert_eq!(promotion.badge_text, DEFAULT_BADGE_TEXT);
        assert!(promotion.is_active);
        repo.delete(promotion.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_update_clears_end_date() {
        let repo = test_repository().await;
        let mut create = new_promotion("Clearable");
        create.end_date = chrono::NaiveDate::from_ymd_opt(2030, 1, 1);
        let promotion = repo.create(&create).await.unwrap();

        let updated = repo
            .update(
                promotion.id,
                &UpdatePromotion {
                    end_date: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.end_date.is_none());
        assert_eq!(updated.title, "Clearable");
        repo.delete(promotion.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_update_clears_description_and_image() {
        let repo = test_repository().await;
        let mut create = new_promotion("With artwork");
        create.description = Some("Two for one".to_string());
        create.image_url = Some("https://cdn.example.com/promo.png".to_string());
        let promotion = repo.create(&create).await.unwrap();

        let kept = repo
            .update(
                promotion.id,
                &UpdatePromotion {
                    image_url: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(kept.image_url.is_none());
        assert_eq!(kept.description.as_deref(), Some("Two for one"));

        let cleared = repo
            .update(
                promotion.id,
                &UpdatePromotion {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.description.is_none());
        repo.delete(promotion.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_delete_missing_promotion() {
        let repo = test_repository().await;
        let result = repo.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }
}

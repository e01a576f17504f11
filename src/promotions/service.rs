use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::engine::{
    active_links, build_report, compute_discounted_price, eligible, is_eligible,
    linked_item_prices, sort_for_display, validate_discount, CountdownView, DiscountType,
    EligibilityCache, EligibleSet, EngineError, EngineResult, LinkedItemPrice, PromotionRotation,
    RestaurantClock, ViewReport,
};
use crate::models::{Promotion, PromotionItem, PromotionView};
use crate::promotions::models::{
    BannerResponse, CreatePromotion, ItemPromotion, LinkItemRequest, PromotionCard,
    UpdateLinkRequest, UpdatePromotion,
};
use crate::promotions::repository::PromotionRepository;
use rust_decimal::Decimal;

/// Service for promotion business logic
///
/// Owns the eligibility snapshot: every promotion or link write drops it so
/// the next public read reloads from the database.
#[derive(Clone)]
pub struct PromotionService {
    repo: PromotionRepository,
    clock: RestaurantClock,
    cache: Arc<EligibilityCache>,
    rotation_period: Duration,
}

impl PromotionService {
    pub fn new(
        repo: PromotionRepository,
        clock: RestaurantClock,
        cache: Arc<EligibilityCache>,
        rotation_period: Duration,
    ) -> Self {
        Self {
            repo,
            clock,
            cache,
            rotation_period,
        }
    }

    pub fn clock(&self) -> &RestaurantClock {
        &self.clock
    }

    /// Eligible promotions for today with their active links
    pub async fn eligible_set(&self) -> EngineResult<Arc<EligibleSet>> {
        let today = self.clock.today();
        let repo = self.repo.clone();

        self.cache
            .get_or_refresh(today, || async move { load_eligible_set(&repo, today).await })
            .await
    }

    /// Drop the snapshot after a write
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }

    /// Periodically rebuild the snapshot in the background
    ///
    /// Aborting the returned handle stops the refresher.
    pub fn spawn_refresher(&self, period: Duration) -> JoinHandle<()> {
        let service = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                let today = service.clock.today();
                let generation = service.cache.generation();
                match load_eligible_set(&service.repo, today).await {
                    Ok(set) => {
                        // A write during the load already dropped the snapshot
                        if let Some(set) = service.cache.publish_if_current(set, generation).await {
                            tracing::debug!(
                                "Refreshed eligibility snapshot: {} promotions live on {}",
                                set.promotions.len(),
                                set.day
                            );
                        }
                    }
                    // Keep serving the previous snapshot until its TTL runs out
                    Err(e) => tracing::error!("Eligibility refresh failed: {}", e),
                }
            }
        })
    }

    /// Public promotion cards, most recent first
    pub async fn public_promotions(&self) -> EngineResult<Vec<PromotionCard>> {
        let set = self.eligible_set().await?;
        Ok(set
            .promotions
            .iter()
            .map(|promotion| self.card(promotion))
            .collect())
    }

    /// Banner state at the requested position
    ///
    /// The position wraps around the number of eligible promotions.
    pub async fn banner(&self, position: Option<usize>) -> EngineResult<BannerResponse> {
        let cards = self.public_promotions().await?;
        let total = cards.len();
        let rotation = PromotionRotation::starting_at(cards, position.unwrap_or(0));

        let index = rotation.position().map(|(current, _)| current - 1);
        let (next_index, prev_index) = match index {
            Some(i) if total > 0 => (Some((i + 1) % total), Some((i + total - 1) % total)),
            _ => (None, None),
        };

        Ok(BannerResponse {
            promotion: rotation.current().cloned(),
            index,
            position: rotation
                .position()
                .map(|(current, total)| format!("{}/{}", current, total)),
            total,
            next_index,
            prev_index,
            show_navigation: rotation.show_navigation(),
            auto_advance_secs: rotation
                .auto_advance_enabled()
                .then_some(self.rotation_period.as_secs()),
        })
    }

    fn card(&self, promotion: &Promotion) -> PromotionCard {
        let now = self.clock.now();
        PromotionCard {
            promotion: promotion.clone(),
            countdown: promotion
                .end_date
                .map(|end| CountdownView::new(self.clock.end_of_day(end), now)),
        }
    }

    pub async fn list(&self, active_only: bool) -> EngineResult<Vec<Promotion>> {
        self.repo.list(active_only).await
    }

    pub async fn create(&self, payload: &CreatePromotion) -> EngineResult<Promotion> {
        let promotion = self.repo.create(payload).await?;
        self.invalidate().await;
        Ok(promotion)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdatePromotion) -> EngineResult<Promotion> {
        let promotion = self.repo.update(id, payload).await?;
        self.invalidate().await;
        Ok(promotion)
    }

    pub async fn delete(&self, id: Uuid) -> EngineResult<()> {
        self.repo.delete(id).await?;
        self.invalidate().await;
        Ok(())
    }

    /// Link a menu item to a promotion
    ///
    /// Missing discount fields default to a 0% percentage (badge only).
    pub async fn link_item(
        &self,
        promotion_id: Uuid,
        request: &LinkItemRequest,
    ) -> EngineResult<PromotionItem> {
        let discount_type = request.discount_type.unwrap_or(DiscountType::Percentage);
        let discount_value = request.discount_value.unwrap_or(Decimal::ZERO);
        validate_discount(discount_type, discount_value)?;

        self.require_promotion(promotion_id).await?;
        if self.repo.find_menu_item(request.menu_item_id).await?.is_none() {
            return Err(EngineError::not_found("Menu item", request.menu_item_id));
        }

        let link = self
            .repo
            .link_item(promotion_id, request.menu_item_id, discount_type, discount_value)
            .await?;
        self.invalidate().await;
        Ok(link)
    }

    pub async fn update_link(
        &self,
        promotion_id: Uuid,
        menu_item_id: Uuid,
        request: &UpdateLinkRequest,
    ) -> EngineResult<PromotionItem> {
        validate_discount(request.discount_type, request.discount_value)?;

        let link = self
            .repo
            .update_link(
                promotion_id,
                menu_item_id,
                request.discount_type,
                request.discount_value,
            )
            .await?
            .ok_or_else(|| {
                EngineError::not_found("Promotion item", format!("{}/{}", promotion_id, menu_item_id))
            })?;

        self.invalidate().await;
        tracing::info!(
            "Updated discount on promotion {} item {} to {} {}",
            promotion_id,
            menu_item_id,
            request.discount_value,
            request.discount_type
        );
        Ok(link)
    }

    pub async fn unlink(&self, promotion_id: Uuid, menu_item_id: Uuid) -> EngineResult<()> {
        if !self.repo.unlink(promotion_id, menu_item_id).await? {
            return Err(EngineError::not_found(
                "Promotion item",
                format!("{}/{}", promotion_id, menu_item_id),
            ));
        }

        self.invalidate().await;
        tracing::info!("Unlinked menu item {} from promotion {}", menu_item_id, promotion_id);
        Ok(())
    }

    /// Priced items linked to a promotion
    pub async fn linked_items(&self, promotion_id: Uuid) -> EngineResult<Vec<LinkedItemPrice>> {
        self.require_promotion(promotion_id).await?;

        let links = self.repo.links_for_promotion(promotion_id).await?;
        let items = self.repo.items_for_promotion(promotion_id).await?;
        linked_item_prices(promotion_id, &links, &items)
    }

    /// Promotions linked to a menu item, with their price effect
    pub async fn item_promotions(&self, menu_item_id: Uuid) -> EngineResult<Vec<ItemPromotion>> {
        let item = self
            .repo
            .find_menu_item(menu_item_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Menu item", menu_item_id))?;

        let links = self.repo.links_for_item(menu_item_id).await?;
        let mut promotions = self.repo.list(false).await?;
        sort_for_display(&mut promotions);

        let today = self.clock.today();
        let mut rows = Vec::new();
        for promotion in &promotions {
            let Some(link) = links.iter().find(|link| link.promotion_id == promotion.id) else {
                continue;
            };

            rows.push(ItemPromotion {
                link_id: link.id,
                promotion_id: promotion.id,
                title: promotion.title.clone(),
                is_active: promotion.is_active,
                start_date: promotion.start_date,
                end_date: promotion.end_date,
                eligible: is_eligible(promotion, today),
                discount_type: link.discount_type,
                discount_value: link.discount_value,
                discounted_price: compute_discounted_price(item.price, link.discount()?)?,
            });
        }

        Ok(rows)
    }

    /// Append a view event for a known promotion
    pub async fn record_view(
        &self,
        promotion_id: Uuid,
        user_agent: Option<&str>,
    ) -> EngineResult<PromotionView> {
        self.require_promotion(promotion_id).await?;
        let view = self.repo.record_view(promotion_id, user_agent).await?;
        tracing::debug!("Recorded view {} for promotion {}", view.id, promotion_id);
        Ok(view)
    }

    pub async fn view_report(&self) -> EngineResult<ViewReport> {
        let mut promotions = self.repo.list(false).await?;
        sort_for_display(&mut promotions);
        let views = self.repo.list_views().await?;

        Ok(build_report(&promotions, &views, self.clock.today()))
    }

    async fn require_promotion(&self, id: Uuid) -> EngineResult<Promotion> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Promotion", id))
    }
}

async fn load_eligible_set(
    repo: &PromotionRepository,
    today: chrono::NaiveDate,
) -> EngineResult<EligibleSet> {
    let promotions = repo.list(true).await?;
    let links = repo.list_links().await?;

    Ok(assemble_eligible_set(&promotions, &links, today))
}

/// Filter loaded rows down to what is live on `today`
fn assemble_eligible_set(
    promotions: &[Promotion],
    links: &[PromotionItem],
    today: chrono::NaiveDate,
) -> EligibleSet {
    let mut live = eligible(promotions, today);
    sort_for_display(&mut live);

    let live_links = active_links(links, promotions, today)
        .into_iter()
        .cloned()
        .collect();

    EligibleSet::new(today, live, live_links)
}

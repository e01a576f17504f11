// View-Count Aggregator
// Tallies promotion impressions into the admin report

use crate::engine::eligibility::is_eligible;
use crate::models::{Promotion, PromotionView};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// View tally for one promotion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PromotionViewStats {
    pub promotion_id: Uuid,
    pub promotion_title: String,
    pub view_count: u64,
}

/// Count views per promotion
///
/// Every promotion gets a row, even with zero views, in input order. Views
/// referencing unknown promotions are ignored.
pub fn aggregate_views(promotions: &[Promotion], views: &[PromotionView]) -> Vec<PromotionViewStats> {
    let mut counts: HashMap<Uuid, u64> = HashMap::with_capacity(promotions.len());
    for view in views {
        *counts.entry(view.promotion_id).or_insert(0) += 1;
    }

    promotions
        .iter()
        .map(|promotion| PromotionViewStats {
            promotion_id: promotion.id,
            promotion_title: promotion.title.clone(),
            view_count: counts.get(&promotion.id).copied().unwrap_or(0),
        })
        .collect()
}

/// Share of `count` in `total`, as a percentage; zero when there are no views
pub fn view_percentage(count: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total)
}

/// Ranked report row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RankedPromotion {
    pub rank: usize,
    pub promotion_id: Uuid,
    pub promotion_title: String,
    pub view_count: u64,
    #[schema(value_type = String, example = "42.5")]
    pub percentage: Decimal,
}

/// Promotion-views report shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ViewReport {
    pub total_views: u64,
    pub top_promotion: Option<RankedPromotion>,
    pub active_promotions: usize,
    pub total_promotions: usize,
    pub ranking: Vec<RankedPromotion>,
}

/// Build the full report
///
/// Ranking is a stable sort by count descending, so promotions with equal
/// counts keep their input order. The top promotion is the head of the
/// ranking, even when every count is zero.
pub fn build_report(promotions: &[Promotion], views: &[PromotionView], today: NaiveDate) -> ViewReport {
    let mut stats = aggregate_views(promotions, views);
    let total_views: u64 = stats.iter().map(|s| s.view_count).sum();

    stats.sort_by(|a, b| b.view_count.cmp(&a.view_count));

    let ranking: Vec<RankedPromotion> = stats
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankedPromotion {
            rank: i + 1,
            promotion_id: s.promotion_id,
            promotion_title: s.promotion_title,
            view_count: s.view_count,
            percentage: view_percentage(s.view_count, total_views),
        })
        .collect();

    ViewReport {
        total_views,
        top_promotion: ranking.first().cloned(),
        active_promotions: promotions.iter().filter(|p| is_eligible(p, today)).count(),
        total_promotions: promotions.len(),
        ranking,
    }
}

// Promotion Eligibility Filter
// Selects the promotions that are switched on and inside their date window for a given day

use crate::engine::window::is_within_window;
use crate::models::{Promotion, PromotionItem};
use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

/// Whether a single promotion is eligible on `today`
pub fn is_eligible(promotion: &Promotion, today: NaiveDate) -> bool {
    promotion.is_active && is_within_window(today, promotion.start_date, promotion.end_date)
}

/// Keep the promotions that are active and inside their window on `today`
///
/// Input order is preserved.
pub fn eligible(promotions: &[Promotion], today: NaiveDate) -> Vec<Promotion> {
    promotions
        .iter()
        .filter(|promotion| is_eligible(promotion, today))
        .cloned()
        .collect()
}

/// Order promotions for display: most recently created first
pub fn sort_for_display(promotions: &mut [Promotion]) {
    promotions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Links whose promotion is eligible on `today`
///
/// Links pointing at a promotion that is not in `promotions` are dropped.
pub fn active_links<'a>(
    links: &'a [PromotionItem],
    promotions: &[Promotion],
    today: NaiveDate,
) -> Vec<&'a PromotionItem> {
    let eligible_ids: HashSet<Uuid> = promotions
        .iter()
        .filter(|promotion| is_eligible(promotion, today))
        .map(|promotion| promotion.id)
        .collect();

    links
        .iter()
        .filter(|link| eligible_ids.contains(&link.promotion_id))
        .collect()
}

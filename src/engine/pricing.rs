// Discount Computation Engine
//
// Computes promotional prices for menu items from their promotion links.
// Percentage and fixed discounts are floored at zero; no rounding is applied.

use crate::engine::{
    eligibility::sort_for_display,
    error::{EngineError, EngineResult},
    types::{Discount, DiscountType},
};
use crate::models::{MenuItem, Promotion, PromotionItem};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Apply a discount to a base price
///
/// Returns the base unchanged when no discount is configured. Negative
/// inputs are rejected; results never go below zero.
pub fn compute_discounted_price(base: Decimal, discount: Discount) -> EngineResult<Decimal> {
    if base < Decimal::ZERO {
        return Err(EngineError::invalid(format!(
            "base price must be non-negative, got {}",
            base
        )));
    }

    let discounted = match discount {
        Discount::NoDiscount => return Ok(base),
        Discount::Percentage(value) => {
            ensure_non_negative(value)?;
            base * (Decimal::ONE - value / Decimal::ONE_HUNDRED)
        }
        Discount::Fixed(value) => {
            ensure_non_negative(value)?;
            base - value
        }
    };

    Ok(discounted.max(Decimal::ZERO))
}

fn ensure_non_negative(value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid(format!(
            "discount value must be non-negative, got {}",
            value
        )));
    }
    Ok(())
}

/// Validate a discount before it is written to a link
///
/// Stricter than the computation itself: percentages above 100 are refused
/// here even though the engine would clamp them.
pub fn validate_discount(discount_type: DiscountType, value: Decimal) -> EngineResult<()> {
    ensure_non_negative(value)?;

    if discount_type == DiscountType::Percentage && value > Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid(
            "percentage discount cannot exceed 100%",
        ));
    }

    Ok(())
}

/// Promotional offer shown on a menu card
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Offer {
    pub promotion_id: Uuid,
    pub promotion_title: String,
    #[schema(example = "Promoção")]
    pub badge_text: String,
    pub discount_type: Option<DiscountType>,
    #[schema(value_type = Option<String>)]
    pub discount_value: Option<Decimal>,
    #[schema(value_type = String)]
    pub original_price: Decimal,
    /// Absent when the link carries no discount (badge only)
    #[schema(value_type = Option<String>)]
    pub discounted_price: Option<Decimal>,
}

/// Pick the best offer for an item among its links to eligible promotions
///
/// `eligible` must already be filtered; it is ranked most recent first and
/// the lowest resulting price wins, the earlier promotion winning ties.
pub fn best_offer(
    item: &MenuItem,
    links: &[PromotionItem],
    eligible: &[Promotion],
) -> EngineResult<Option<Offer>> {
    let mut ranked: Vec<Promotion> = eligible.to_vec();
    sort_for_display(&mut ranked);

    let item_links: HashMap<Uuid, &PromotionItem> = links
        .iter()
        .filter(|link| link.menu_item_id == item.id)
        .map(|link| (link.promotion_id, link))
        .collect();

    let mut best: Option<(Decimal, Offer)> = None;

    for promotion in &ranked {
        let Some(link) = item_links.get(&promotion.id) else {
            continue;
        };

        let discount = link.discount()?;
        let price = compute_discounted_price(item.price, discount)?;

        let better = match &best {
            Some((best_price, _)) => price < *best_price,
            None => true,
        };

        if better {
            let (discount_type, discount_value) = discount.into_parts();
            let offer = Offer {
                promotion_id: promotion.id,
                promotion_title: promotion.title.clone(),
                badge_text: promotion.badge_text.clone(),
                discount_type,
                discount_value,
                original_price: item.price,
                discounted_price: discount.is_configured().then_some(price),
            };
            best = Some((price, offer));
        }
    }

    Ok(best.map(|(_, offer)| offer))
}

/// Row of the admin table listing a promotion's linked items
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LinkedItemPrice {
    pub link_id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_item_name: String,
    pub is_active: bool,
    pub discount_type: Option<DiscountType>,
    #[schema(value_type = Option<String>)]
    pub discount_value: Option<Decimal>,
    #[schema(value_type = String)]
    pub base_price: Decimal,
    #[schema(value_type = String)]
    pub discounted_price: Decimal,
}

/// Priced items linked to one promotion, ordered by item name
///
/// Links whose menu item no longer exists are skipped.
pub fn linked_item_prices(
    promotion_id: Uuid,
    links: &[PromotionItem],
    items: &[MenuItem],
) -> EngineResult<Vec<LinkedItemPrice>> {
    let by_id: HashMap<Uuid, &MenuItem> = items.iter().map(|item| (item.id, item)).collect();

    let mut rows = Vec::new();
    for link in links.iter().filter(|link| link.promotion_id == promotion_id) {
        let Some(item) = by_id.get(&link.menu_item_id) else {
            tracing::debug!(
                "Skipping link {} to missing menu item {}",
                link.id,
                link.menu_item_id
            );
            continue;
        };

        let discount = link.discount()?;
        rows.push(LinkedItemPrice {
            link_id: link.id,
            menu_item_id: item.id,
            menu_item_name: item.name.clone(),
            is_active: item.is_active,
            discount_type: link.discount_type,
            discount_value: link.discount_value,
            base_price: item.price,
            discounted_price: compute_discounted_price(item.price, discount)?,
        });
    }

    rows.sort_by(|a, b| a.menu_item_name.cmp(&b.menu_item_name));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_discount() {
        let price = compute_discounted_price(dec!(50.00), Discount::Percentage(dec!(10))).unwrap();
        assert_eq!(price, dec!(45.00));
    }

    #[test]
    fn test_fixed_discount() {
        let price = compute_discounted_price(dec!(50.00), Discount::Fixed(dec!(7.50))).unwrap();
        assert_eq!(price, dec!(42.50));
    }

    #[test]
    fn test_no_discount_returns_base() {
        let price = compute_discounted_price(dec!(19.90), Discount::NoDiscount).unwrap();
        assert_eq!(price, dec!(19.90));
    }

    #[test]
    fn test_fixed_discount_floors_at_zero() {
        let price = compute_discounted_price(dec!(10), Discount::Fixed(dec!(15))).unwrap();
        assert_eq!(price, Decimal::ZERO);
    }

    #[test]
    fn test_percentage_over_hundred_floors_at_zero() {
        let price = compute_discounted_price(dec!(10), Discount::Percentage(dec!(150))).unwrap();
        assert_eq!(price, Decimal::ZERO);
    }

    #[test]
    fn test_no_rounding() {
        let price = compute_discounted_price(dec!(9.99), Discount::Percentage(dec!(15))).unwrap();
        assert_eq!(price, dec!(8.4915));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(compute_discounted_price(dec!(-1), Discount::NoDiscount).is_err());
        assert!(compute_discounted_price(dec!(10), Discount::Fixed(dec!(-1))).is_err());
        assert!(compute_discounted_price(dec!(10), Discount::Percentage(dec!(-5))).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(DiscountType::Percentage, dec!(100)).is_ok());
        assert!(validate_discount(DiscountType::Percentage, dec!(100.01)).is_err());
        assert!(validate_discount(DiscountType::Fixed, dec!(250)).is_ok());
        assert!(validate_discount(DiscountType::Fixed, dec!(-0.5)).is_err());
    }

    #[test]
    fn test_best_offer_picks_lowest_price() {
        let item = fixtures::menu_item(Uuid::new_v4(), "Lasagna", dec!(40));
        let small = fixtures::promotion("small", true);
        let big = fixtures::promotion("big", true);

        let links = vec![
            fixtures::link(small.id, item.id, Some(DiscountType::Fixed), Some(dec!(2))),
            fixtures::link(big.id, item.id, Some(DiscountType::Percentage), Some(dec!(25))),
        ];

        let offer = best_offer(&item, &links, &[small, big.clone()]).unwrap().unwrap();
        assert_eq!(offer.promotion_id, big.id);
        assert_eq!(offer.discounted_price, Some(dec!(30)));
        assert_eq!(offer.original_price, dec!(40));
    }

    #[test]
    fn test_best_offer_tie_goes_to_most_recent() {
        let item = fixtures::menu_item(Uuid::new_v4(), "Soup", dec!(20));
        let mut older = fixtures::promotion("older", true);
        older.created_at = Utc::now() - Duration::days(3);
        let newer = fixtures::promotion("newer", true);

        let links = vec![
            fixtures::link(older.id, item.id, Some(DiscountType::Fixed), Some(dec!(5))),
            fixtures::link(newer.id, item.id, Some(DiscountType::Percentage), Some(dec!(25))),
        ];

        let offer = best_offer(&item, &links, &[older, newer.clone()]).unwrap().unwrap();
        assert_eq!(offer.promotion_id, newer.id);
    }

    #[test]
    fn test_best_offer_badge_only_link() {
        let item = fixtures::menu_item(Uuid::new_v4(), "Tea", dec!(6));
        let promotion = fixtures::promotion("tea time", true);
        let links = vec![fixtures::link(promotion.id, item.id, None, None)];

        let offer = best_offer(&item, &links, &[promotion]).unwrap().unwrap();
        assert_eq!(offer.discounted_price, None);
        assert_eq!(offer.badge_text, "Promoção");
    }

    #[test]
    fn test_best_offer_ignores_links_outside_eligible_set() {
        let item = fixtures::menu_item(Uuid::new_v4(), "Tea", dec!(6));
        let promotion = fixtures::promotion("elsewhere", true);
        let links = vec![fixtures::link(
            promotion.id,
            item.id,
            Some(DiscountType::Fixed),
            Some(dec!(1)),
        )];

        assert!(best_offer(&item, &links, &[]).unwrap().is_none());
    }

    #[test]
    fn test_linked_item_prices_skips_dangling_links() {
        let promotion = fixtures::promotion("combo", true);
        let category = Uuid::new_v4();
        let pizza = fixtures::menu_item(category, "Pizza", dec!(50));
        let beer = fixtures::menu_item(category, "Beer", dec!(12));

        let links = vec![
            fixtures::link(promotion.id, pizza.id, Some(DiscountType::Percentage), Some(dec!(10))),
            fixtures::link(promotion.id, beer.id, Some(DiscountType::Fixed), Some(dec!(2))),
            fixtures::link(promotion.id, Uuid::new_v4(), Some(DiscountType::Fixed), Some(dec!(1))),
            fixtures::link(Uuid::new_v4(), pizza.id, Some(DiscountType::Fixed), Some(dec!(3))),
        ];

        let rows = linked_item_prices(promotion.id, &links, &[pizza, beer]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].menu_item_name, "Beer");
        assert_eq!(rows[0].discounted_price, dec!(10));
        assert_eq!(rows[1].menu_item_name, "Pizza");
        assert_eq!(rows[1].discounted_price, dec!(45));
    }

    fn arb_discount() -> impl Strategy<Value = Discount> {
        prop_oneof![
            Just(Discount::NoDiscount),
            (0u32..20_000).prop_map(|v| Discount::Percentage(Decimal::new(v as i64, 2))),
            (0u32..100_000).prop_map(|v| Discount::Fixed(Decimal::new(v as i64, 2))),
        ]
    }

    proptest! {
        #[test]
        fn prop_price_within_zero_and_base(
            cents in 0u32..1_000_000,
            discount in arb_discount(),
        ) {
            let base = Decimal::new(cents as i64, 2);
            let price = compute_discounted_price(base, discount).unwrap();
            prop_assert!(price >= Decimal::ZERO);
            prop_assert!(price <= base);
        }
    }
}

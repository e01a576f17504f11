// Public menu assembly
// Groups active items under their categories and attaches each item's best live offer

use crate::catalog::models::{MenuItemCard, MenuSection};
use crate::engine::{best_offer, EngineResult};
use crate::models::{Category, MenuItem, Promotion, PromotionItem};
use std::collections::HashMap;
use uuid::Uuid;

/// Case-insensitive match on name or description
pub fn matches_search(item: &MenuItem, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    item.name.to_lowercase().contains(&needle)
        || item
            .description
            .as_deref()
            .map(|d| d.to_lowercase().contains(&needle))
            .unwrap_or(false)
}

/// Build the public menu
///
/// Only active items are shown. Items pointing at an unknown category are
/// dropped, as are categories left without items. Sections follow
/// `display_order` and items are sorted by name.
pub fn build_menu(
    categories: &[Category],
    items: &[MenuItem],
    links: &[PromotionItem],
    eligible: &[Promotion],
    search: Option<&str>,
) -> EngineResult<Vec<MenuSection>> {
    let mut by_category: HashMap<Uuid, Vec<MenuItemCard>> = HashMap::new();

    for item in items {
        if !item.is_active {
            continue;
        }
        if let Some(search) = search {
            if !matches_search(item, search) {
                continue;
            }
        }

        let offer = best_offer(item, links, eligible)?;
        by_category
            .entry(item.category_id)
            .or_default()
            .push(MenuItemCard {
                item: item.clone(),
                offer,
            });
    }

    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by(|a, b| a.display_order.cmp(&b.display_order));

    let sections = ordered
        .into_iter()
        .filter_map(|category| {
            let mut cards = by_category.remove(&category.id)?;
            cards.sort_by(|a, b| a.item.name.cmp(&b.item.name));
            Some(MenuSection {
                category: Category {
                    item_count: cards.len() as i64,
                    ..category.clone()
                },
                items: cards,
            })
        })
        .collect();

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DiscountType;
    use crate::models::fixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_menu_groups_active_items_by_display_order() {
        let drinks = fixtures::category("Drinks", 2);
        let mains = fixtures::category("Mains", 1);
        let empty = fixtures::category("Desserts", 3);

        let mut hidden = fixtures::menu_item(mains.id, "Hidden", dec!(10));
        hidden.is_active = false;

        let items = vec![
            fixtures::menu_item(drinks.id, "Water", dec!(4)),
            fixtures::menu_item(mains.id, "Risotto", dec!(48)),
            fixtures::menu_item(mains.id, "Lasagna", dec!(45)),
            fixtures::menu_item(uuid::Uuid::new_v4(), "Orphan", dec!(1)),
            hidden,
        ];

        let menu = build_menu(&[drinks, mains, empty], &items, &[], &[], None).unwrap();

        let names: Vec<&str> = menu.iter().map(|s| s.category.name.as_str()).collect();
        assert_eq!(names, vec!["Mains", "Drinks"]);

        let mains_items: Vec<&str> = menu[0].items.iter().map(|c| c.item.name.as_str()).collect();
        assert_eq!(mains_items, vec!["Lasagna", "Risotto"]);
        assert_eq!(menu[0].category.item_count, 2);
    }

    #[test]
    fn test_menu_attaches_offers() {
        let mains = fixtures::category("Mains", 1);
        let item = fixtures::menu_item(mains.id, "Steak", dec!(80));
        let promotion = fixtures::promotion("Steak night", true);
        let links = vec![fixtures::link(
            promotion.id,
            item.id,
            Some(DiscountType::Percentage),
            Some(dec!(25)),
        )];

        let menu = build_menu(&[mains], &[item], &links, &[promotion], None).unwrap();
        let offer = menu[0].items[0].offer.as_ref().unwrap();
        assert_eq!(offer.discounted_price, Some(dec!(60)));
    }

    #[test]
    fn test_menu_search() {
        let mains = fixtures::category("Mains", 1);
        let mut soup = fixtures::menu_item(mains.id, "Soup of the day", dec!(20));
        soup.description = Some("Creamy PUMPKIN".to_string());
        let steak = fixtures::menu_item(mains.id, "Steak", dec!(80));

        let menu = build_menu(&[mains.clone()], &[soup.clone(), steak.clone()], &[], &[], Some("pumpkin")).unwrap();
        assert_eq!(menu[0].items.len(), 1);
        assert_eq!(menu[0].items[0].item.name, "Soup of the day");

        let menu = build_menu(&[mains], &[soup, steak], &[], &[], Some("lobster")).unwrap();
        assert!(menu.is_empty());
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let item = fixtures::menu_item(uuid::Uuid::new_v4(), "Anything", dec!(1));
        assert!(matches_search(&item, "   "));
    }
}

use super::*;
use rust_decimal::Decimal;

fn item(name: &str, category: Option<&str>) -> OfferLineItem {
    let item = OfferLineItem::new(name, Decimal::TEN, Decimal::from(23));
    match category {
        Some(c) => item.with_category(c),
        None => item,
    }
}

fn labels(groups: &[CategoryGroup]) -> Vec<&str> {
    groups.iter().map(|g| g.label.as_str()).collect()
}

fn ab_order() -> GroupOrder {
    let mut order = CategoryOrder::default();
    order.insert("A", 2);
    order.insert("B", 1);
    GroupOrder::DisplayOrder(order)
}

#[test]
fn test_groups_follow_display_order() {
    let items = vec![item("x", Some("A")), item("y", None), item("z", Some("B"))];

    let groups = group_items(&items, &ab_order(), &HashMap::new());
    assert_eq!(labels(&groups), vec!["B", "A", UNCATEGORIZED]);
    assert!(groups.iter().all(|g| g.is_expanded));
}

#[test]
fn test_unknown_categories_sort_last_in_first_seen_order() {
    let items = vec![
        item("1", Some("Zeta")),
        item("2", Some("A")),
        item("3", Some("Alpha")),
        item("4", Some("Zeta")),
    ];

    let groups = group_items(&items, &ab_order(), &HashMap::new());
    assert_eq!(labels(&groups), vec!["A", "Zeta", "Alpha"]);
    assert_eq!(groups[1].len(), 2);
    assert_eq!(groups[1].item_ids[0], items[0].instance_id());
    assert_eq!(groups[1].item_ids[1], items[3].instance_id());
}

#[test]
fn test_blank_category_is_uncategorized() {
    assert_eq!(category_label(None), UNCATEGORIZED);
    assert_eq!(category_label(Some("  ")), UNCATEGORIZED);
    assert_eq!(category_label(Some("Tools")), "Tools");
}

#[test]
fn test_alphabetical_order_puts_uncategorized_last() {
    let items = vec![
        item("1", None),
        item("2", Some("tools")),
        item("3", Some("Cables")),
        item("4", Some("Zones")),
    ];

    let groups = group_items(&items, &GroupOrder::Alphabetical, &HashMap::new());
    assert_eq!(labels(&groups), vec!["Cables", "tools", "Zones", UNCATEGORIZED]);
}

#[test]
fn test_first_seen_order() {
    let items = vec![item("1", Some("B")), item("2", Some("A")), item("3", Some("B"))];

    let groups = group_items(&items, &GroupOrder::FirstSeen, &HashMap::new());
    assert_eq!(labels(&groups), vec!["B", "A"]);
}

#[test]
fn test_category_order_from_names() {
    let order = CategoryOrder::from_names(&["Tools", "Cables", "Tools"]);
    assert_eq!(order.rank("Tools"), 1);
    assert_eq!(order.rank("Cables"), 2);
    assert_eq!(order.rank("Lamps"), UNRANKED_DISPLAY_ORDER);
}

#[test]
fn test_category_order_from_categories() {
    let categories = vec![
        Category {
            id: 1,
            name: "Lamps".to_string(),
            default_margin: Decimal::from(25),
            display_order: 5,
        },
        Category {
            id: 2,
            name: "Cables".to_string(),
            default_margin: Decimal::from(15),
            display_order: 3,
        },
    ];
    let order = CategoryOrder::from_categories(&categories);
    assert_eq!(order.rank("Cables"), 3);
    assert_eq!(order.rank("Lamps"), 5);
}

#[test]
fn test_cache_reuses_result_for_same_version() {
    let mut items = vec![item("x", Some("A")), item("y", Some("B"))];
    let mut cache = GroupingCache::new();
    let order = ab_order();

    let first = cache.groups(1, &items, &order);

    // value edit, version unchanged
    items[0].set_margin(Decimal::from(40));
    let second = cache.groups(1, &items, &order);
    assert!(Arc::ptr_eq(&first, &second));

    // structural change bumps the version
    items.push(item("z", None));
    let third = cache.groups(2, &items, &order);
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.len(), 3);
    assert_eq!(cache.cached_version(), Some(2));
}

#[test]
fn test_expanded_state_survives_regrouping() {
    let mut items = vec![item("x", Some("A")), item("y", Some("B"))];
    let mut cache = GroupingCache::new();
    let order = ab_order();

    cache.groups(1, &items, &order);
    cache.set_expanded("A", false);
    let groups = cache.groups(1, &items, &order);
    assert!(!groups.iter().find(|g| g.label == "A").unwrap().is_expanded);

    items.push(item("z", Some("A")));
    let groups = cache.groups(2, &items, &order);
    let a = groups.iter().find(|g| g.label == "A").unwrap();
    assert!(!a.is_expanded);
    assert_eq!(a.len(), 2);
    assert!(groups.iter().find(|g| g.label == "B").unwrap().is_expanded);
}

#[test]
fn test_invalidate_forces_regroup() {
    let items = vec![item("x", Some("A")), item("y", Some("B"))];
    let mut cache = GroupingCache::new();

    let first = cache.groups(1, &items, &ab_order());
    cache.invalidate();
    assert_eq!(cache.cached_version(), None);

    let second = cache.groups(1, &items, &GroupOrder::Alphabetical);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(labels(&second), vec!["A", "B"]);
}

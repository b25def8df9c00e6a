use super::*;
use crate::grouping::UNCATEGORIZED;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn item(name: &str, category: Option<&str>, purchase: &str) -> OfferLineItem {
    let item = OfferLineItem::new(name, dec(purchase), Decimal::from(23)).with_margin(Decimal::from(20));
    match category {
        Some(c) => item.with_category(c),
        None => item,
    }
}

fn sample_items() -> Vec<OfferLineItem> {
    vec![
        item("Spot", Some("Lamps"), "100"),
        item("Screw", None, "1"),
        item("Cable 3x1.5", Some("Cables"), "10").with_quantity(Decimal::from(2)),
        item("Bulb", Some("Lamps"), "5"),
    ]
}

fn card() -> BusinessCard {
    BusinessCard {
        company: "Acme Electric".to_string(),
        full_name: "Jan Kowalski".to_string(),
        phone: "600 100 200".to_string(),
        email: "jan@acme.test".to_string(),
    }
}

fn categories(doc: &OfferDocument) -> Vec<&str> {
    doc.sections.iter().map(|s| s.category.as_str()).collect()
}

#[test]
fn test_sections_alphabetical_without_order() {
    let doc = OfferDocument::build(&sample_items(), None, None);

    assert_eq!(categories(&doc), vec!["Cables", "Lamps", UNCATEGORIZED]);
    let positions: Vec<usize> = doc
        .sections
        .iter()
        .flat_map(|s| s.lines.iter().map(|l| l.position))
        .collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
    assert_eq!(doc.sections[1].lines[0].name, "Spot");
    assert_eq!(doc.sections[1].lines[1].name, "Bulb");
}

#[test]
fn test_sections_follow_custom_order() {
    let order = vec!["Lamps".to_string(), UNCATEGORIZED.to_string()];
    let doc = OfferDocument::build(&sample_items(), None, Some(order.as_slice()));

    // Cables is not in the order, so it goes last
    assert_eq!(categories(&doc), vec!["Lamps", UNCATEGORIZED, "Cables"]);

    let empty: Vec<String> = Vec::new();
    let doc = OfferDocument::build(&sample_items(), None, Some(empty.as_slice()));
    assert_eq!(categories(&doc), vec!["Cables", "Lamps", UNCATEGORIZED]);
}

#[test]
fn test_section_and_document_totals() {
    let doc = OfferDocument::build(&sample_items(), None, None);

    let lamps = &doc.sections[1];
    // 120.00 + 6.00 net
    assert_eq!(lamps.total_net, dec("126.00"));
    assert_eq!(lamps.total_gross, dec("154.98"));

    assert_eq!(doc.totals, OfferTotals::compute(&sample_items()));
    assert_eq!(doc.line_count(), 4);
}

#[test]
fn test_blank_business_card_is_dropped() {
    let doc = OfferDocument::build(&sample_items(), Some(BusinessCard::default()), None);
    assert!(doc.business_card.is_none());

    let doc = OfferDocument::build(&sample_items(), Some(card()), None);
    assert_eq!(doc.business_card, Some(card()));
}

#[test]
fn test_text_render_layout() {
    let doc = OfferDocument::build(&sample_items(), Some(card()), None)
        .with_title("Kitchen lighting")
        .with_date(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    let renderer = TextOfferRenderer::new(80, 200, "zł");

    let bytes = renderer.render(&doc).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.contains("Acme Electric"));
    assert!(text.contains("600 100 200 | jan@acme.test"));
    assert!(text.contains("OFFER: Kitchen lighting"));
    assert!(text.contains("2026-03-14"));
    assert!(text.contains("[Cables]"));
    assert!(text.contains("[Uncategorized]"));
    assert!(text.contains("Total gross:"));
    assert!(text.contains("Items in offer: 4"));
    assert!(text.contains("Page 1/1"));
    assert!(!text.contains('\u{c}'));

    let cables = text.find("[Cables]").unwrap();
    let lamps = text.find("[Lamps]").unwrap();
    assert!(cables < lamps);

    assert!(text.lines().all(|l| l.chars().count() <= 80));
}

#[test]
fn test_text_render_paginates() {
    let items: Vec<OfferLineItem> = (0..40)
        .map(|i| item(&format!("Item {i}"), Some("Bulk"), "1"))
        .collect();
    let doc = OfferDocument::build(&items, None, None);
    let renderer = TextOfferRenderer::new(80, 20, "zł");

    let text = String::from_utf8(renderer.render(&doc).unwrap()).unwrap();
    let pages: Vec<&str> = text.split('\u{c}').collect();

    assert!(pages.len() > 1);
    let count = pages.len();
    for (index, page) in pages.iter().enumerate() {
        assert!(page.lines().count() <= 20);
        assert!(page.contains(&format!("Page {}/{}", index + 1, count)));
    }
}

#[test]
fn test_long_names_wrap_within_width() {
    let items = vec![item(
        "Very long product description that cannot fit in one column",
        None,
        "10",
    )];
    let doc = OfferDocument::build(&items, None, None);
    let text = String::from_utf8(TextOfferRenderer::default().render(&doc).unwrap()).unwrap();

    assert!(text.lines().all(|l| l.chars().count() <= 80));
    assert!(text.contains("column"));
}

#[test]
fn test_render_errors() {
    let doc = OfferDocument::build(&[], None, None);
    assert!(matches!(
        TextOfferRenderer::default().render(&doc),
        Err(RenderError::EmptyDocument)
    ));

    let doc = OfferDocument::build(&sample_items(), None, None);
    assert!(matches!(
        TextOfferRenderer::new(40, 60, "zł").render(&doc),
        Err(RenderError::WidthTooSmall { width: 40, .. })
    ));
    assert!(matches!(
        TextOfferRenderer::new(80, 3, "zł").render(&doc),
        Err(RenderError::PageTooShort { lines: 3, .. })
    ));

    let err: AppError = RenderError::EmptyDocument.into();
    assert_eq!(err.code, shared::error::ErrorCode::RenderFailed);
}

//! Cart and tier pricing behaviour across the crate boundary.
//!
//! Tiers are 480/460/445 rupees a piece for 1-40, 41-60 and 61+ units, priced on the cart's
//! combined quantity. A browsing cart never exceeds a model's stock, an edit cart may.

use rusty_money::{Money, iso::INR};
use testresult::TestResult;

use diecast::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogItem, ModelId},
    orders::{Order, OrderId, OrderLineItem},
    pricing::PriceSchedule,
    storefront::BrowseCart,
};

fn rupees(amount: i64) -> Money<'static, rusty_money::iso::Currency> {
    Money::from_minor(amount * 100, INR)
}

fn catalog() -> Catalog {
    Catalog::new(vec![
        CatalogItem {
            id: ModelId::new("gt3"),
            name: "Porsche 911 GT3".to_string(),
            color: "Shark Blue".to_string(),
            image: "gt3.jpg".to_string(),
            stock: 50,
        },
        CatalogItem {
            id: ModelId::new("r34"),
            name: "Skyline R34".to_string(),
            color: "Bayside Blue".to_string(),
            image: "r34.jpg".to_string(),
            stock: 30,
        },
    ])
}

#[test]
fn unit_price_changes_exactly_at_tier_boundaries() {
    let schedule = PriceSchedule::storefront();

    assert_eq!(schedule.unit_price(1), rupees(480));
    assert_eq!(schedule.unit_price(40), rupees(480));
    assert_eq!(schedule.unit_price(41), rupees(460));
    assert_eq!(schedule.unit_price(60), rupees(460));
    assert_eq!(schedule.unit_price(61), rupees(445));
    assert_eq!(schedule.unit_price(10_000), rupees(445));
}

#[test]
fn tier_is_chosen_by_combined_quantity() -> TestResult {
    let schedule = PriceSchedule::storefront();
    let mut browse = BrowseCart::new(catalog());

    browse.adjust(&ModelId::new("gt3"), 35);
    browse.adjust(&ModelId::new("r34"), 10);

    let quote = browse.cart().quote(&schedule)?;

    assert_eq!(
        quote.map(|quote| (quote.quantity, quote.unit_price, quote.subtotal)),
        Some((45, rupees(460), rupees(45 * 460))),
        "45 pieces across two models fall in the 41-60 tier"
    );

    Ok(())
}

#[test]
fn browsing_caps_each_model_at_its_stock() {
    let mut browse = BrowseCart::new(catalog());
    let r34 = ModelId::new("r34");

    assert_eq!(browse.adjust(&r34, 25), 25);
    assert_eq!(browse.adjust(&r34, 25), 30);
    assert_eq!(browse.cart().quantity(&r34), 30);
}

#[test]
fn browsing_an_unlisted_model_selects_nothing() {
    let mut browse = BrowseCart::new(catalog());

    assert_eq!(browse.adjust(&ModelId::new("ghost"), 3), 0);
    assert!(browse.cart().is_empty());
}

#[test]
fn quantities_never_drop_below_zero() {
    let mut cart = Cart::new();
    let gt3 = ModelId::new("gt3");

    cart.adjust_quantity(&gt3, 2, Some(50));

    assert_eq!(cart.adjust_quantity(&gt3, -5, Some(50)), 0);
    assert_eq!(cart.adjust_quantity(&gt3, i64::MIN, None), 0);
    assert_eq!(cart.total_quantity(), 0);
}

#[test]
fn uncapped_adjustments_can_exceed_stock() {
    let order = Order {
        id: OrderId::new("o-1"),
        username: "ravi".to_string(),
        selected_models: vec![OrderLineItem {
            id: ModelId::new("r34"),
            name: "Skyline R34".to_string(),
            quantity: 29,
            image: String::new(),
            color: "Bayside Blue".to_string(),
        }],
    };

    let mut cart = Cart::from_order(&order);

    assert_eq!(cart.adjust_quantity(&ModelId::new("r34"), 5, None), 34);
}

#[test]
fn empty_selection_cannot_be_materialized() {
    let mut cart = Cart::new();

    cart.adjust_quantity(&ModelId::new("gt3"), 3, None);
    cart.adjust_quantity(&ModelId::new("gt3"), -3, None);

    assert_eq!(
        cart.materialize_selection(&catalog()),
        Err(CartError::EmptySelection)
    );
}

#[test]
fn materialized_lines_keep_quantities_and_fall_back_for_unknown_models() -> TestResult {
    let cart = Cart::with_quantities([
        (ModelId::new("gt3"), 4),
        (ModelId::new("retired"), 2),
        (ModelId::new("r34"), 0),
    ]);

    let lines = cart.materialize_selection(&catalog())?;

    let summary: Vec<_> = lines
        .iter()
        .map(|line| (line.id.as_str(), line.name.as_str(), line.color.as_str(), line.quantity))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("gt3", "Porsche 911 GT3", "Shark Blue", 4),
            ("retired", "Unknown", "N/A", 2),
        ]
    );

    Ok(())
}

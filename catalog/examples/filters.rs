// Example: filter changes reset the window, background fetches keep it.
use catalog::{
    Catalog, CatalogOptions, FilterPatch, PriceRange, PricingTier, RawItem, TierSet,
};

fn main() {
    let mut c = Catalog::new(CatalogOptions::new().with_page_size(2));
    let snapshot = vec![
        RawItem::new("Lamp", PricingTier::Paid).with_price(40.0),
        RawItem::new("Chair", PricingTier::Free),
        RawItem::new("Desk", PricingTier::Paid).with_price(400.0),
        RawItem::new("Poster", PricingTier::ViewOnly),
    ];

    c.begin_fetch();
    c.complete_fetch(snapshot.clone(), 1);
    c.load_more_displayed();
    println!("page={} displayed={}", c.page(), c.displayed_len());

    c.update_filters(
        FilterPatch::default()
            .with_pricing_options([PricingTier::Paid].into_iter().collect::<TierSet>())
            .with_price_range(PriceRange::new(0.0, 100.0)),
    );
    println!(
        "paid under 100: {:?}",
        c.displayed_items().map(|it| &it.title).collect::<Vec<_>>()
    );

    // Refetching the same snapshot appends it again under fresh ids.
    c.begin_fetch();
    c.complete_fetch(snapshot, 2);
    for item in c.displayed_items() {
        println!("  {} -> {}", item.title, item.id);
    }
}

use catalog::{Catalog, CatalogOptions, PricingTier, RawItem, SortMode};

fn main() {
    let mut c = Catalog::new(CatalogOptions::new().with_page_size(4));

    // The adapter starts a fetch and later settles it with whatever the source returned.
    c.begin_fetch();
    let batch = (0..10)
        .map(|i| {
            let tier = PricingTier::ALL[i % 3];
            let raw = RawItem::new(format!("Item {i:02}"), tier).with_user_name("demo");
            if tier == PricingTier::Paid {
                raw.with_price((i * 7) as f64)
            } else {
                raw
            }
        })
        .collect();
    c.complete_fetch(batch, 0);

    println!("status={:?}", c.status());
    for item in c.displayed_items() {
        println!("  {} {:?}", item.title, item.price_label());
    }

    c.load_more_displayed();
    println!(
        "after load_more: displayed={} of {}",
        c.displayed_len(),
        c.filtered_len()
    );

    c.set_sort_mode(SortMode::PriceHigh);
    println!(
        "after sort: page={} first={:?}",
        c.page(),
        c.displayed_items().next().map(|it| &it.title)
    );

    println!("should_fetch_more={}", c.should_fetch_more());
}

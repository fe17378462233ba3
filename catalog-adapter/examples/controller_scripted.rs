use catalog::{CatalogOptions, PricingTier, RawItem};
use catalog_adapter::{Controller, FetchError, FetchOutcome, ScriptedSource};

fn main() {
    // Example: a controller driven by a scripted source, without any UI objects.
    //
    // An adapter would:
    // - call fetch(now_ms) on mount
    // - call on_sentinel_visible(now_ms) when the "load more" marker scrolls into view
    // - forward keystrokes to on_search_input and call tick(now_ms) from a timer
    // - render from catalog().status() and catalog().displayed_items()
    let snapshot: Vec<RawItem> = (0..30)
        .map(|i| {
            let tier = PricingTier::ALL[i % 3];
            let raw = RawItem::new(format!("Jacket {i:02}"), tier).with_id(format!("j{i}"));
            if tier == PricingTier::Paid {
                raw.with_price(20.0 + i as f64)
            } else {
                raw
            }
        })
        .collect();

    let mut source = ScriptedSource::repeating(snapshot, 2);
    source.push_err(FetchError::Transport("simulated outage".to_string()));

    let mut c = Controller::new(CatalogOptions::default(), source);
    c.apply_query("?pricing=0,1&sort=priceHigh");

    let mut now_ms = 0u64;
    println!("mount: {:?}", c.fetch(now_ms));

    for _ in 0..6 {
        now_ms += 500;
        let outcome = c.on_sentinel_visible(now_ms);
        println!(
            "t={now_ms} {outcome:?} page={} displayed={}/{} status={:?}",
            c.catalog().page(),
            c.catalog().displayed_len(),
            c.catalog().filtered_len(),
            c.catalog().status(),
        );
        if outcome == FetchOutcome::Failed {
            println!("  error={:?}; retrying", c.catalog().error());
            println!("  retry: {:?}", c.fetch(now_ms));
        }
    }

    c.on_search_input("jacket 1", now_ms);
    now_ms += 300;
    c.tick(now_ms);
    println!("query: ?{}", c.query_string());
    for item in c.catalog().displayed_items() {
        println!("  {} {:?}", item.title, item.price_label());
    }
}

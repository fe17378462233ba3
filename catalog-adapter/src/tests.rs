use crate::*;

use catalog::{
    CatalogOptions, CatalogStatus, FilterConfig, PriceRange, PricingTier, RawItem, SortMode,
    TierSet,
};

fn snapshot(n: usize) -> Vec<RawItem> {
    (0..n)
        .map(|i| {
            let tier = PricingTier::ALL[i % 3];
            let raw = RawItem::new(format!("Item {i:03}"), tier).with_id(format!("src{i}"));
            if tier == PricingTier::Paid {
                raw.with_price(10.0 + i as f64)
            } else {
                raw
            }
        })
        .collect()
}

fn controller(source: ScriptedSource) -> Controller<ScriptedSource> {
    Controller::new(CatalogOptions::default(), source)
}

#[test]
fn initial_fetch_fills_first_page() {
    let mut c = controller(ScriptedSource::repeating(snapshot(30), 1));
    assert_eq!(c.catalog().status(), CatalogStatus::Empty);

    assert_eq!(c.fetch(5), FetchOutcome::Appended(30));
    assert_eq!(c.catalog().item_count(), 30);
    assert_eq!(c.catalog().displayed_len(), 12);
    assert_eq!(c.catalog().fetch_count(), 1);
    assert!(!c.catalog().loading());
    assert_eq!(
        c.catalog().status(),
        CatalogStatus::Browsing {
            loading_more: false,
            show_sentinel: true,
        }
    );
    assert_eq!(c.catalog().items()[0].id.as_str(), "src0-0-0-5");
}

#[test]
fn repeated_snapshot_duplicates_until_exhausted() {
    let mut c = controller(ScriptedSource::repeating(snapshot(3), 2));

    assert_eq!(c.fetch(1), FetchOutcome::Appended(3));
    assert_eq!(c.fetch(2), FetchOutcome::Appended(3));
    assert_eq!(c.catalog().item_count(), 6);

    assert_eq!(c.fetch(3), FetchOutcome::Exhausted);
    assert!(!c.catalog().has_more_to_fetch());
    assert_eq!(c.catalog().item_count(), 6);

    // Exhaustion is final: no further requests reach the source.
    assert_eq!(c.fetch(4), FetchOutcome::Skipped);
    assert_eq!(c.source().calls(), 3);

    let ids: std::collections::HashSet<_> = c.catalog().items().iter().map(|i| &i.id).collect();
    assert_eq!(ids.len(), 6);
}

#[test]
fn failed_fetch_keeps_items_and_can_be_retried() {
    let mut source = ScriptedSource::repeating(snapshot(4), 1);
    source.push_err(FetchError::Transport("connection reset".to_string()));
    source.push_ok(snapshot(2));
    let mut c = controller(source);

    assert_eq!(c.fetch(0), FetchOutcome::Appended(4));
    assert_eq!(c.fetch(1), FetchOutcome::Failed);
    assert_eq!(c.catalog().error(), Some(FETCH_FAILED_MESSAGE));
    assert_eq!(c.catalog().item_count(), 4);
    assert_eq!(c.catalog().fetch_count(), 1);
    assert!(!c.catalog().loading());
    assert!(c.catalog().has_more_to_fetch());

    assert_eq!(c.fetch(2), FetchOutcome::Appended(2));
    assert_eq!(c.catalog().error(), None);
    assert_eq!(c.catalog().item_count(), 6);
    assert_eq!(c.catalog().fetch_count(), 2);
}

#[test]
fn parse_failures_surface_the_same_message() {
    let source = ScriptedSource::new([Err(FetchError::Parse("expected array".to_string()))]);
    let mut c = controller(source);

    assert_eq!(c.fetch(0), FetchOutcome::Failed);
    assert_eq!(c.catalog().error(), Some("Failed to fetch content"));
    assert_eq!(c.catalog().status(), CatalogStatus::Empty);
}

#[test]
fn fetch_is_skipped_while_loading() {
    let mut c = controller(ScriptedSource::repeating(snapshot(3), 3));
    assert!(c.catalog_mut().begin_fetch());

    assert_eq!(c.fetch(0), FetchOutcome::Skipped);
    assert_eq!(c.source().calls(), 0);
}

#[test]
fn sentinel_grows_page_then_prefetches_when_running_low() {
    let mut c = controller(ScriptedSource::repeating(snapshot(40), 5));
    assert_eq!(c.fetch(0), FetchOutcome::Appended(40));
    assert_eq!(c.catalog().displayed_len(), 12);

    // 40 - 24 = 16 undisplayed items, within the threshold of 20.
    assert_eq!(c.on_sentinel_visible(10), FetchOutcome::Appended(40));
    assert_eq!(c.catalog().page(), 2);
    assert_eq!(c.catalog().displayed_len(), 24);
    assert_eq!(c.catalog().item_count(), 80);
    assert_eq!(c.source().calls(), 2);
}

#[test]
fn sentinel_only_grows_page_while_plenty_remain() {
    let mut c = controller(ScriptedSource::repeating(snapshot(100), 5));
    c.fetch(0);

    assert_eq!(c.on_sentinel_visible(10), FetchOutcome::Skipped);
    assert_eq!(c.catalog().page(), 2);
    assert_eq!(c.catalog().displayed_len(), 24);
    assert_eq!(c.source().calls(), 1);
}

#[test]
fn sentinel_fetches_when_filters_leave_too_few_items() {
    let mut c = controller(ScriptedSource::repeating(snapshot(60), 2));
    c.fetch(0);
    c.catalog_mut()
        .set_pricing_tiers(TierSet::from_iter([PricingTier::Free]));
    assert_eq!(c.catalog().filtered_len(), 20);
    assert_eq!(c.catalog().page(), 1);

    assert_eq!(c.on_sentinel_visible(20), FetchOutcome::Appended(60));
    assert_eq!(c.catalog().filtered_len(), 40);
    // The background fetch keeps the grown page.
    assert_eq!(c.catalog().page(), 2);
    assert_eq!(c.catalog().displayed_len(), 24);
}

#[test]
fn sentinel_after_exhaustion_reaches_end_of_results() {
    let mut c = controller(ScriptedSource::repeating(snapshot(15), 1));
    c.fetch(0);

    assert_eq!(c.on_sentinel_visible(10), FetchOutcome::Exhausted);
    assert_eq!(c.catalog().displayed_len(), 15);
    assert_eq!(c.catalog().status(), CatalogStatus::EndOfResults);

    assert_eq!(c.on_sentinel_visible(20), FetchOutcome::Skipped);
    assert_eq!(c.source().calls(), 2);
}

#[test]
fn search_input_is_applied_after_the_pause() {
    let mut c = controller(ScriptedSource::repeating(snapshot(30), 1));
    c.fetch(0);
    c.on_sentinel_visible(1);
    assert_eq!(c.catalog().page(), 2);

    c.on_search_input("item 00", 100);
    c.on_search_input("item 01", 200);
    assert!(!c.tick(499));
    assert_eq!(c.catalog().filters().search_keyword, "");

    assert!(c.tick(500));
    assert_eq!(c.catalog().filters().search_keyword, "item 01");
    assert_eq!(c.catalog().page(), 1);
    assert_eq!(c.catalog().filtered_len(), 10);

    // Nothing pending any more.
    assert!(!c.tick(10_000));
}

#[test]
fn unchanged_keyword_is_not_reapplied() {
    let mut c = controller(ScriptedSource::default());
    c.on_search_input("", 0);
    assert!(!c.tick(DEFAULT_DEBOUNCE_MS));
    assert!(!c.debouncer().is_pending());

    c.on_search_input("shirt", 0);
    assert!(c.flush_search());
    assert_eq!(c.catalog().filters().search_keyword, "shirt");
}

#[test]
fn apply_query_replaces_filters() {
    let mut c = controller(ScriptedSource::default());
    c.catalog_mut().set_search_keyword("old");

    assert!(c.apply_query("?pricing=0&sort=priceLow&priceMin=10&priceMax=50"));
    let filters = c.catalog().filters();
    assert_eq!(filters.pricing_options, TierSet::from_iter([PricingTier::Paid]));
    assert_eq!(filters.sort_by, SortMode::PriceLow);
    assert_eq!(filters.price_range, PriceRange::new(10.0, 50.0));
    // Omitted keys take defaults rather than keeping the previous value.
    assert_eq!(filters.search_keyword, "");

    assert_eq!(
        c.query_string(),
        "pricing=0&sort=priceLow&priceMin=10&priceMax=50"
    );
}

#[test]
fn apply_query_without_filters_changes_nothing() {
    let mut c = controller(ScriptedSource::default());
    c.catalog_mut().set_sort_mode(SortMode::Name);

    assert!(!c.apply_query("utm_source=newsletter"));
    assert!(!c.apply_query(""));
    assert_eq!(c.catalog().filters().sort_by, SortMode::Name);
}

#[test]
fn apply_query_cancels_pending_search() {
    let mut c = controller(ScriptedSource::default());
    c.on_search_input("typed", 0);

    assert!(c.apply_query("search=linked"));
    assert!(!c.tick(1_000));
    assert_eq!(c.catalog().filters().search_keyword, "linked");
}

#[test]
fn borrowed_source_is_usable() {
    let mut source = ScriptedSource::repeating(snapshot(2), 1);
    {
        let mut c = Controller::new(CatalogOptions::default(), &mut source);
        assert_eq!(c.fetch(0), FetchOutcome::Appended(2));
        let (catalog, _) = c.into_parts();
        assert_eq!(catalog.item_count(), 2);
    }
    assert_eq!(source.calls(), 1);
    assert_eq!(source.remaining(), 0);
}

#[test]
fn query_encodes_only_non_default_fields() {
    assert_eq!(query::encode(&FilterConfig::default()), "");

    let filters = FilterConfig {
        pricing_options: TierSet::from_iter([PricingTier::ViewOnly, PricingTier::Paid]),
        search_keyword: "red dress".to_string(),
        sort_by: SortMode::Name,
        price_range: PriceRange::new(0.0, 120.5),
    };
    assert_eq!(
        query::encode(&filters),
        "pricing=0%2C2&search=red+dress&sort=name&priceMax=120.5"
    );
    assert_eq!(query::decode(&query::encode(&filters)), filters);
}

#[test]
fn query_tier_codes_are_validated() {
    let filters = query::decode("pricing=0,9,2,x");
    assert_eq!(
        filters.pricing_options,
        TierSet::from_iter([PricingTier::Paid, PricingTier::ViewOnly])
    );

    let filters = query::decode("pricing=0%2C1");
    assert_eq!(
        filters.pricing_options,
        TierSet::from_iter([PricingTier::Paid, PricingTier::Free])
    );

    // Present but entirely invalid still means "all tiers".
    let patch = query::decode_patch("pricing=7");
    assert_eq!(patch.pricing_options, Some(TierSet::empty()));
}

#[test]
fn query_keyword_is_percent_decoded() {
    assert_eq!(query::decode("search=red+dress").search_keyword, "red dress");
    assert_eq!(query::decode("?search=caf%C3%A9").search_keyword, "café");
    assert_eq!(query::decode("search=a&search=b").search_keyword, "a");
}

#[test]
fn query_unknown_sort_is_ignored() {
    let patch = query::decode_patch("sort=cheapest");
    assert_eq!(patch.sort_by, None);
    assert!(patch.is_empty());
    assert_eq!(query::decode("sort=priceHigh").sort_by, SortMode::PriceHigh);
}

#[test]
fn query_sort_defaults_to_relevance() {
    assert_eq!(query::decode("").sort_by, SortMode::Relevance);
    assert_eq!(query::decode("pricing=1").sort_by, SortMode::Relevance);
    assert_eq!(query::decode_patch("pricing=1").sort_by, None);

    let relevance = FilterConfig {
        sort_by: SortMode::Relevance,
        ..FilterConfig::default()
    };
    assert_eq!(query::encode(&relevance), "");

    let name = FilterConfig {
        sort_by: SortMode::Name,
        ..FilterConfig::default()
    };
    assert_eq!(query::encode(&name), "sort=name");
    assert_eq!(query::decode("sort=name").sort_by, SortMode::Name);
}

#[test]
fn query_prices_outside_bounds_are_dropped() {
    assert_eq!(query::decode_patch("priceMin=-5&priceMax=2000").price_range, None);
    assert_eq!(query::decode_patch("priceMin=abc").price_range, None);
    assert_eq!(query::decode_patch("priceMax=NaN").price_range, None);
    assert_eq!(query::decode_patch("priceMax=inf").price_range, None);

    assert_eq!(
        query::decode_patch("priceMin=100").price_range,
        Some(PriceRange::new(100.0, 999.0))
    );
    assert_eq!(
        query::decode_patch("priceMin=-1&priceMax=40").price_range,
        Some(PriceRange::new(0.0, 40.0))
    );
}

#[test]
fn query_inverted_range_resets_to_defaults() {
    let patch = query::decode_patch("priceMin=80&priceMax=20");
    assert_eq!(patch.price_range, Some(PriceRange::default()));
}

#[test]
fn parse_batch_accepts_source_records() {
    let body = br#"[
        {"id": "a1", "title": "Coat", "userName": "mika", "imagePath": "https://img/1.png", "pricingOption": 0, "price": 49.5},
        {"id": 17, "title": "Scarf", "userName": "jo", "pricingOption": 1, "price": null},
        {"title": "Hat", "pricingOption": 2},
        {"id": "", "pricingOption": 1}
    ]"#;
    let items = parse_batch(body).unwrap();
    assert_eq!(items.len(), 4);

    assert_eq!(items[0].id.as_deref(), Some("a1"));
    assert_eq!(items[0].user_name.as_deref(), Some("mika"));
    assert_eq!(items[0].image_path.as_deref(), Some("https://img/1.png"));
    assert_eq!(items[0].pricing_option, PricingTier::Paid);
    assert_eq!(items[0].price, Some(49.5));

    assert_eq!(items[1].id.as_deref(), Some("17"));
    assert_eq!(items[1].price, None);
    assert_eq!(items[1].image_path, None);

    assert_eq!(items[2].id, None);
    assert_eq!(items[2].pricing_option, PricingTier::ViewOnly);

    assert_eq!(items[3].id, None);
    assert_eq!(items[3].title, None);
}

#[test]
fn parse_batch_rejects_malformed_bodies() {
    for body in [
        &br#"{"items": []}"#[..],
        &br#"[{"title": "x", "pricingOption": 7}]"#[..],
        &br#"[{"title": "x"}]"#[..],
        &b"not json"[..],
    ] {
        assert!(matches!(parse_batch(body), Err(FetchError::Parse(_))));
    }
    assert_eq!(parse_batch(b"[]").unwrap(), Vec::new());
}

#[test]
fn debouncer_restarts_on_each_input() {
    let mut d = KeywordDebouncer::new(300);
    assert_eq!(d.tick(0), None);

    d.on_input("c", 0);
    d.on_input("co", 250);
    assert_eq!(d.deadline_ms(), Some(550));
    assert_eq!(d.tick(549), None);
    assert_eq!(d.pending(), Some("co"));
    assert_eq!(d.tick(550).as_deref(), Some("co"));
    assert!(!d.is_pending());

    d.on_input("coat", 600);
    assert_eq!(d.flush().as_deref(), Some("coat"));
    assert_eq!(d.flush(), None);

    d.on_input("x", 700);
    d.cancel();
    assert_eq!(d.tick(5_000), None);
}

#[cfg(feature = "http")]
mod http_source {
    use crate::*;

    #[test]
    fn config_defaults_apply_to_missing_fields() {
        let config: HttpSourceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, HttpSourceConfig::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let config: HttpSourceConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn invalid_endpoints_are_config_errors() {
        for endpoint in ["not a url", "ftp://example.com/data", ""] {
            let config = HttpSourceConfig::default().with_endpoint(endpoint);
            let err = HttpSource::from_config(&config).unwrap_err();
            assert!(matches!(err, FetchError::Config(_)), "{endpoint}: {err}");
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn source_keeps_configured_endpoint() {
        let config = HttpSourceConfig::default()
            .with_endpoint("https://example.com/api/data")
            .with_timeout_secs(3);
        let source = HttpSource::from_config(&config).unwrap();
        assert_eq!(source.endpoint(), "https://example.com/api/data");
    }
}

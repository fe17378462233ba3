//! URL query (de)serialization of the filter configuration.
//!
//! Recognized keys:
//!
//! | key        | value                                   |
//! |------------|-----------------------------------------|
//! | `pricing`  | comma-joined tier codes (`0,2`)         |
//! | `search`   | keyword                                 |
//! | `sort`     | `relevance`, `name`, `priceHigh`, `priceLow` |
//! | `priceMin` | number in `[PRICE_FLOOR, PRICE_CEIL]`   |
//! | `priceMax` | number in `[PRICE_FLOOR, PRICE_CEIL]`   |
//!
//! Decoding never fails: unknown keys are ignored and malformed values are treated as absent.

use catalog::{
    FilterConfig, FilterPatch, PRICE_CEIL, PRICE_FLOOR, PriceRange, PricingTier, SortMode,
    TierSet,
};
use url::form_urlencoded;

pub const KEY_PRICING: &str = "pricing";
pub const KEY_SEARCH: &str = "search";
pub const KEY_SORT: &str = "sort";
pub const KEY_PRICE_MIN: &str = "priceMin";
pub const KEY_PRICE_MAX: &str = "priceMax";

/// Serializes the non-default fields of `filters` as a query string (without a leading `?`).
///
/// A default configuration encodes to the empty string.
pub fn encode(filters: &FilterConfig) -> String {
    let defaults = PriceRange::default();
    let mut out = form_urlencoded::Serializer::new(String::new());

    if !filters.pricing_options.is_empty() {
        let codes: Vec<String> = filters
            .pricing_options
            .iter()
            .map(|t| t.code().to_string())
            .collect();
        out.append_pair(KEY_PRICING, &codes.join(","));
    }
    if !filters.search_keyword.is_empty() {
        out.append_pair(KEY_SEARCH, &filters.search_keyword);
    }
    if filters.sort_by != SortMode::default() {
        out.append_pair(KEY_SORT, filters.sort_by.as_str());
    }
    if filters.price_range.min != defaults.min {
        out.append_pair(KEY_PRICE_MIN, &filters.price_range.min.to_string());
    }
    if filters.price_range.max != defaults.max {
        out.append_pair(KEY_PRICE_MAX, &filters.price_range.max.to_string());
    }

    out.finish()
}

/// Parses a query string into a full configuration; absent or invalid fields take defaults.
pub fn decode(query: &str) -> FilterConfig {
    let mut filters = FilterConfig::default();
    filters.merge(decode_patch(query));
    filters
}

/// Parses a query string keeping only the recognized keys that carry valid values.
///
/// A leading `?` is accepted. When a key repeats, the first occurrence wins.
pub fn decode_patch(query: &str) -> FilterPatch {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut pricing = None;
    let mut search = None;
    let mut sort = None;
    let mut price_min = None;
    let mut price_max = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            KEY_PRICING if pricing.is_none() => pricing = Some(parse_tiers(&value)),
            KEY_SEARCH if search.is_none() => search = Some(value.into_owned()),
            KEY_SORT if sort.is_none() => sort = Some(value.parse::<SortMode>().ok()),
            KEY_PRICE_MIN if price_min.is_none() => price_min = Some(parse_price(&value)),
            KEY_PRICE_MAX if price_max.is_none() => price_max = Some(parse_price(&value)),
            _ => {
                atrace!(key = &*key, "query: ignored key");
            }
        }
    }

    FilterPatch {
        pricing_options: pricing,
        search_keyword: search,
        sort_by: sort.flatten(),
        price_range: resolve_range(price_min.flatten(), price_max.flatten()),
    }
}

fn parse_tiers(value: &str) -> TierSet {
    value
        .split(',')
        .filter_map(|part| part.trim().parse::<u8>().ok())
        .filter_map(PricingTier::from_code)
        .collect()
}

fn parse_price(value: &str) -> Option<f64> {
    let price = value.trim().parse::<f64>().ok()?;
    (price.is_finite() && (PRICE_FLOOR..=PRICE_CEIL).contains(&price)).then_some(price)
}

fn resolve_range(min: Option<f64>, max: Option<f64>) -> Option<PriceRange> {
    if min.is_none() && max.is_none() {
        return None;
    }
    let defaults = PriceRange::default();
    let min = min.unwrap_or(defaults.min);
    let max = max.unwrap_or(defaults.max);
    if min > max {
        adebug!(min, max, "query: inverted price range, using defaults");
        return Some(defaults);
    }
    Some(PriceRange { min, max })
}

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};

use crate::{Item, PriceRange, PricingTier, SortMode, TierSet};

/// The user-selected filter and sort configuration.
///
/// Every field defaults to "no constraint", so a default configuration keeps every item in
/// arrival order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct FilterConfig {
    /// Selected tiers. Empty means all tiers.
    pub pricing_options: TierSet,
    pub search_keyword: String,
    pub sort_by: SortMode,
    /// Only enforced for `Paid` items, and only while `Paid` is selected.
    pub price_range: PriceRange,
}

impl FilterConfig {
    /// Whether the price range currently constrains anything.
    pub fn price_filter_active(&self) -> bool {
        self.pricing_options.contains(PricingTier::Paid)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Applies a partial update in place.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(tiers) = patch.pricing_options {
            self.pricing_options = tiers;
        }
        if let Some(keyword) = patch.search_keyword {
            self.search_keyword = keyword;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(range) = patch.price_range {
            self.price_range = range;
        }
    }
}

/// A partial [`FilterConfig`] update: `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct FilterPatch {
    pub pricing_options: Option<TierSet>,
    pub search_keyword: Option<String>,
    pub sort_by: Option<SortMode>,
    pub price_range: Option<PriceRange>,
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        self.pricing_options.is_none()
            && self.search_keyword.is_none()
            && self.sort_by.is_none()
            && self.price_range.is_none()
    }

    pub fn with_pricing_options(mut self, tiers: TierSet) -> Self {
        self.pricing_options = Some(tiers);
        self
    }

    pub fn with_search_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.search_keyword = Some(keyword.into());
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortMode) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }
}

impl From<FilterConfig> for FilterPatch {
    fn from(config: FilterConfig) -> Self {
        Self {
            pricing_options: Some(config.pricing_options),
            search_keyword: Some(config.search_keyword),
            sort_by: Some(config.sort_by),
            price_range: Some(config.price_range),
        }
    }
}

// Per-recompute view of a `FilterConfig` with the keyword folded once.
// Whitespace only decides whether the keyword applies; a keyword that does apply is matched as
// typed, surrounding spaces included.
struct Matcher {
    tiers: TierSet,
    keyword: Option<String>,
    price: Option<PriceRange>,
}

impl Matcher {
    fn new(config: &FilterConfig) -> Self {
        let keyword = &config.search_keyword;
        Self {
            tiers: config.pricing_options,
            keyword: (!keyword.trim().is_empty()).then(|| keyword.to_lowercase()),
            price: config
                .price_filter_active()
                .then_some(config.price_range),
        }
    }

    fn matches(&self, item: &Item) -> bool {
        if !self.tiers.is_empty() && !self.tiers.contains(item.pricing_option) {
            return false;
        }

        if let Some(keyword) = &self.keyword {
            let hit = item.title.to_lowercase().contains(keyword.as_str())
                || item.user_name.to_lowercase().contains(keyword.as_str());
            if !hit {
                return false;
            }
        }

        if let Some(range) = &self.price {
            if item.pricing_option == PricingTier::Paid {
                return item.price.is_some_and(|p| range.contains(p));
            }
        }

        true
    }
}

/// Runs the filter pipeline over `master` and returns the surviving indexes in display order.
///
/// Stages run in a fixed order: tier, keyword, price range, sort. The result only ever holds
/// indexes into `master`, each at most once.
pub fn compute_filtered(master: &[Item], config: &FilterConfig) -> Vec<usize> {
    let matcher = Matcher::new(config);
    let mut out: Vec<usize> = master
        .iter()
        .enumerate()
        .filter(|(_, item)| matcher.matches(item))
        .map(|(i, _)| i)
        .collect();
    sort_indexes(master, &mut out, config.sort_by);
    out
}

/// Returns the displayed window: the first `page * page_size` entries of `filtered`.
///
/// Clamps to `filtered.len()`; never panics.
pub fn compute_displayed<T>(filtered: &[T], page: usize, page_size: usize) -> &[T] {
    let len = page.saturating_mul(page_size).min(filtered.len());
    &filtered[..len]
}

fn sort_indexes(master: &[Item], indexes: &mut [usize], sort_by: SortMode) {
    // `sort_by` is stable, ties keep arrival order.
    match sort_by {
        SortMode::Relevance => {}
        SortMode::Name => match title_collator() {
            Some(collator) => {
                indexes.sort_by(|&a, &b| collator.compare(&master[a].title, &master[b].title));
            }
            None => {
                indexes.sort_by(|&a, &b| fold_compare(&master[a].title, &master[b].title));
            }
        },
        SortMode::PriceHigh => {
            indexes.sort_by(|&a, &b| {
                compare_prices(master[a].price, master[b].price, |x, y| y.total_cmp(&x))
            });
        }
        SortMode::PriceLow => {
            indexes.sort_by(|&a, &b| {
                compare_prices(master[a].price, master[b].price, |x, y| x.total_cmp(&y))
            });
        }
    }
}

// Missing prices sort last regardless of direction.
fn compare_prices(
    a: Option<f64>,
    b: Option<f64>,
    present: impl Fn(f64, f64) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => present(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Collation used by [`SortMode::Name`].
///
/// Root-locale collation at the default (tertiary) strength: punctuation before letters,
/// accented letters next to their base letter, and lowercase before uppercase on case ties.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    match title_collator() {
        Some(collator) => collator.compare(a, b),
        None => fold_compare(a, b),
    }
}

fn title_collator() -> Option<CollatorBorrowed<'static>> {
    match Collator::try_new(CollatorPreferences::default(), CollatorOptions::default()) {
        Ok(collator) => Some(collator),
        Err(_err) => {
            cwarn!(error = %_err, "root collation data unavailable, using case folding");
            None
        }
    }
}

// Case-insensitive code point order, lowercase first on ties.
fn fold_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

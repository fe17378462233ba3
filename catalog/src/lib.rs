//! A headless catalog engine: filtering, sorting and progressive pagination over an
//! incrementally fetched item collection.
//!
//! For the data source, URL sync and a ready-made driver, see the `catalog-adapter` crate.
//!
//! The engine keeps three collections consistent:
//! - the append-only master collection of every item fetched so far
//! - the filtered collection (master after the tier, keyword and price filters, then sorted)
//! - the displayed window (the first `page * page_size` filtered items)
//!
//! It is UI-agnostic and performs no I/O. An adapter is expected to:
//! - report fetch progress (`begin_fetch`, `complete_fetch`, `fail_fetch`)
//! - forward filter/sort changes from the UI
//! - call `load_more_displayed` when the user reaches the end of the window
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod catalog;
mod filter;
mod id;
mod options;
mod state;
mod types;


pub use catalog::{Catalog, CatalogEvent};
pub use filter::{FilterConfig, FilterPatch, compare_titles, compute_displayed, compute_filtered};
pub use id::synthesize_id;
pub use options::{
    CatalogOptions, DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_THRESHOLD, OnChangeCallback,
};
pub use state::{CatalogState, CatalogStatus, FetchState, ViewState};
pub use types::{
    InvalidTierCode, Item, ItemId, PRICE_CEIL, PRICE_FLOOR, PriceRange, PricingTier, RawItem,
    SortMode, TierSet, UnknownSortMode,
};

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::filter::{compute_displayed, compute_filtered};
use crate::id::{IdIndex, synthesize_id};
use crate::{
    CatalogOptions, CatalogState, CatalogStatus, FetchState, FilterConfig, FilterPatch, Item,
    ItemId, PriceRange, PricingTier, RawItem, SortMode, TierSet, ViewState,
};

/// An input to [`Catalog::update`].
///
/// Each variant corresponds to one external trigger: a configuration change from the UI, a page
/// advance from the scroll layer, or a step of the fetch lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogEvent {
    FiltersReplaced(FilterConfig),
    FiltersPatched(FilterPatch),
    FiltersReset,
    PageAdvanced,
    FetchStarted,
    FetchSucceeded { batch: Vec<RawItem>, now_ms: u64 },
    FetchFailed { message: String },
}

/// A headless catalog state engine.
///
/// The catalog owns an append-only master collection of fetched items and keeps two views of it
/// consistent:
/// - the *filtered* collection: master after the filter + sort pipeline
/// - the *displayed* window: the first `page * page_size` filtered items
///
/// Both views are rebuilt from the master collection after every state-changing event; they are
/// never patched incrementally.
///
/// This type does no I/O and reads no clock. Adapters drive it by reporting fetch progress
/// (`begin_fetch` / `complete_fetch` / `fail_fetch`), configuration changes, and page advances.
/// For a ready-made driver, see the `catalog-adapter` crate.
#[derive(Clone, Debug)]
pub struct Catalog {
    options: CatalogOptions,
    filters: FilterConfig,
    page: usize,

    items: Vec<Item>,
    ids: IdIndex,
    filtered: Vec<usize>, // indexes into `items`
    displayed_len: usize,

    fetch_count: u64,
    has_more_to_fetch: bool,
    loading: bool,
    error: Option<String>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogOptions::default())
    }
}

impl Catalog {
    pub fn new(options: CatalogOptions) -> Self {
        cdebug!(
            page_size = options.page_size,
            prefetch_threshold = options.prefetch_threshold,
            "Catalog::new"
        );
        Self {
            filters: options.initial_filters.clone(),
            page: 1,
            items: Vec::new(),
            ids: IdIndex::default(),
            filtered: Vec::new(),
            displayed_len: 0,
            fetch_count: 0,
            has_more_to_fetch: true,
            loading: false,
            error: None,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    /// Replaces the options.
    ///
    /// The current filters and page are kept; the displayed window is re-sliced with the new
    /// page size.
    pub fn set_options(&mut self, options: CatalogOptions) {
        self.options = options;
        ctrace!(
            page_size = self.options.page_size,
            prefetch_threshold = self.options.prefetch_threshold,
            "Catalog::set_options"
        );
        self.redisplay();
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut CatalogOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(&mut self, on_change: Option<impl Fn(&Catalog) + Send + Sync + 'static>) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.update_options(|o| o.page_size = page_size.max(1));
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    /// Applies one event.
    ///
    /// Returns `false` only when the event was suppressed: a `FetchStarted` while a fetch is
    /// already in flight.
    pub fn update(&mut self, event: CatalogEvent) -> bool {
        match event {
            CatalogEvent::FiltersReplaced(filters) => self.set_filters(filters),
            CatalogEvent::FiltersPatched(patch) => self.update_filters(patch),
            CatalogEvent::FiltersReset => self.reset_filters(),
            CatalogEvent::PageAdvanced => self.load_more_displayed(),
            CatalogEvent::FetchStarted => return self.begin_fetch(),
            CatalogEvent::FetchSucceeded { batch, now_ms } => self.complete_fetch(batch, now_ms),
            CatalogEvent::FetchFailed { message } => self.fail_fetch(message),
        }
        true
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    /// Replaces the whole filter configuration, resets to page 1 and recomputes.
    pub fn set_filters(&mut self, filters: FilterConfig) {
        self.reconfigure(|f| *f = filters);
    }

    /// Merges a partial configuration, resets to page 1 and recomputes.
    pub fn update_filters(&mut self, patch: FilterPatch) {
        self.reconfigure(|f| f.merge(patch));
    }

    pub fn set_pricing_tiers(&mut self, tiers: TierSet) {
        self.reconfigure(|f| f.pricing_options = tiers);
    }

    /// Selects `tier` if unselected, unselects it otherwise.
    pub fn toggle_pricing_tier(&mut self, tier: PricingTier) {
        self.reconfigure(|f| {
            f.pricing_options.toggle(tier);
        });
    }

    pub fn set_search_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        self.reconfigure(|f| f.search_keyword = keyword);
    }

    pub fn set_sort_mode(&mut self, sort_by: SortMode) {
        self.reconfigure(|f| f.sort_by = sort_by);
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.reconfigure(|f| f.price_range = range);
    }

    /// Restores `options.initial_filters`.
    pub fn reset_filters(&mut self) {
        let initial = self.options.initial_filters.clone();
        self.reconfigure(|f| *f = initial);
    }

    /// Whether a price slider should accept input: the range only applies while `Paid` is
    /// selected.
    pub fn price_range_enabled(&self) -> bool {
        self.filters.price_filter_active()
    }

    fn reconfigure(&mut self, f: impl FnOnce(&mut FilterConfig)) {
        f(&mut self.filters);
        self.page = 1;
        self.recompute();
        ctrace!(
            filtered = self.filtered.len(),
            displayed = self.displayed_len,
            "Catalog::reconfigure"
        );
        self.notify();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.options.effective_page_size()
    }

    /// Grows the displayed window by one page.
    ///
    /// Once everything filtered is displayed this leaves the window unchanged, though the page
    /// counter still advances.
    pub fn load_more_displayed(&mut self) {
        self.page = self.page.saturating_add(1);
        self.redisplay();
        ctrace!(
            page = self.page,
            displayed = self.displayed_len,
            "Catalog::load_more_displayed"
        );
        self.notify();
    }

    pub fn has_more_displayed(&self) -> bool {
        self.displayed_len < self.filtered.len()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetch_count
    }

    pub fn has_more_to_fetch(&self) -> bool {
        self.has_more_to_fetch
    }

    /// Marks a fetch as started.
    ///
    /// Returns `false` (and changes nothing) while another fetch is in flight.
    pub fn begin_fetch(&mut self) -> bool {
        if self.loading {
            ctrace!("Catalog::begin_fetch suppressed: already loading");
            return false;
        }
        self.loading = true;
        self.error = None;
        cdebug!(fetch_index = self.fetch_count, "Catalog::begin_fetch");
        self.notify();
        true
    }

    /// Settles a fetch with the batch it delivered.
    ///
    /// Items get ids synthesized from the pre-fetch counter, then the counter advances. An empty
    /// batch marks the source as exhausted for the rest of the session. The current page is
    /// kept, and the views are rebuilt under the *current* filters, so a late batch never
    /// overrides a newer configuration.
    pub fn complete_fetch(&mut self, batch: Vec<RawItem>, now_ms: u64) {
        if !self.loading {
            cwarn!(
                fetch_index = self.fetch_count,
                "Catalog::complete_fetch without a matching begin_fetch"
            );
        }
        let fetch_index = self.fetch_count;
        let received = batch.len();

        self.items.reserve(received);
        for (position, raw) in batch.into_iter().enumerate() {
            let id = synthesize_id(&raw, fetch_index, position, now_ms);
            self.ids.insert(id.clone(), self.items.len());
            self.items.push(Item::from_raw(raw, id));
        }
        debug_assert_eq!(self.ids.len(), self.items.len(), "every item owns one id");
        self.fetch_count = self.fetch_count.saturating_add(1);

        if received == 0 {
            self.has_more_to_fetch = false;
        }

        self.recompute();
        self.loading = false;
        cdebug!(
            fetch_index,
            received,
            total = self.items.len(),
            filtered = self.filtered.len(),
            exhausted = !self.has_more_to_fetch,
            "Catalog::complete_fetch"
        );
        self.notify();
    }

    /// Settles a fetch as failed.
    ///
    /// Only `loading` and `error` change; the fetch can be retried.
    pub fn fail_fetch(&mut self, message: impl Into<String>) {
        let message = message.into();
        cdebug!(
            fetch_index = self.fetch_count,
            error = message.as_str(),
            "Catalog::fail_fetch"
        );
        self.loading = false;
        self.error = Some(message);
        self.notify();
    }

    /// Whether the adapter should start another fetch now.
    ///
    /// True when more data may exist, no fetch is in flight, and at most `prefetch_threshold`
    /// filtered items remain undisplayed.
    pub fn should_fetch_more(&self) -> bool {
        let remaining = self.filtered.len().saturating_sub(self.displayed_len);
        self.has_more_to_fetch && !self.loading && remaining <= self.options.prefetch_threshold
    }

    fn recompute(&mut self) {
        self.filtered = compute_filtered(&self.items, &self.filters);
        self.redisplay();
    }

    fn redisplay(&mut self) {
        self.displayed_len = compute_displayed(&self.filtered, self.page, self.page_size()).len();
    }

    /// All items received so far, in arrival order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Looks an item up by its synthesized id.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.ids.get(id).map(|i| &self.items[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed_len
    }

    pub fn filtered_items(&self) -> impl ExactSizeIterator<Item = &Item> + '_ {
        self.filtered.iter().map(move |&i| &self.items[i])
    }

    pub fn displayed_items(&self) -> impl ExactSizeIterator<Item = &Item> + '_ {
        self.filtered[..self.displayed_len]
            .iter()
            .map(move |&i| &self.items[i])
    }

    /// Iterates over the displayed window without allocations.
    pub fn for_each_displayed_item(&self, mut f: impl FnMut(usize, &Item)) {
        for (pos, &i) in self.filtered[..self.displayed_len].iter().enumerate() {
            f(pos, &self.items[i]);
        }
    }

    /// Collects the displayed window.
    pub fn get_displayed_items(&self) -> Vec<&Item> {
        self.displayed_items().collect()
    }

    pub fn status(&self) -> CatalogStatus {
        if self.displayed_len == 0 {
            return if self.loading {
                CatalogStatus::InitialLoading
            } else {
                CatalogStatus::Empty
            };
        }
        let has_more_displayed = self.has_more_displayed();
        if !has_more_displayed && !self.has_more_to_fetch && !self.loading {
            return CatalogStatus::EndOfResults;
        }
        CatalogStatus::Browsing {
            loading_more: self.loading,
            show_sentinel: (has_more_displayed || self.has_more_to_fetch) && !self.loading,
        }
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            filters: self.filters.clone(),
            page: self.page,
        }
    }

    pub fn fetch_state(&self) -> FetchState {
        FetchState {
            fetch_count: self.fetch_count,
            has_more_to_fetch: self.has_more_to_fetch,
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    pub fn state(&self) -> CatalogState {
        CatalogState {
            view: self.view_state(),
            fetch: self.fetch_state(),
        }
    }

    /// Restores filters and page from a previously captured snapshot.
    ///
    /// Fetch state and items are not part of a view snapshot and stay as they are.
    pub fn restore_view_state(&mut self, view: ViewState) {
        self.filters = view.filters;
        self.page = view.page.max(1);
        self.recompute();
        cdebug!(
            page = self.page,
            displayed = self.displayed_len,
            "Catalog::restore_view_state"
        );
        self.notify();
    }
}

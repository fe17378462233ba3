use catalog::{Catalog, CatalogOptions};

use crate::KeywordDebouncer;
use crate::query;
use crate::source::DataSource;

/// The result of [`Controller::fetch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No request was made: a fetch is in flight or the source is exhausted.
    Skipped,
    /// The batch was appended; carries its length.
    Appended(usize),
    /// The source returned an empty batch; no further fetches will be made.
    Exhausted,
    /// The request failed; the catalog holds the user-facing message and can be retried.
    Failed,
}

/// A framework-neutral controller that wraps a [`Catalog`] and its [`DataSource`].
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `fetch(now_ms)` on mount (and for an explicit retry)
/// - `on_sentinel_visible(now_ms)` when the "load more" marker scrolls into view
/// - `on_search_input(text, now_ms)` per keystroke and `tick(now_ms)` each frame/timer tick
/// - `apply_query` / `query_string` to keep the address bar in sync
///
/// Fetches are synchronous: the whole begin/settle cycle runs inside one call.
#[derive(Debug)]
pub struct Controller<S> {
    catalog: Catalog,
    source: S,
    debouncer: KeywordDebouncer,
}

impl<S: DataSource> Controller<S> {
    pub fn new(options: CatalogOptions, source: S) -> Self {
        Self::from_catalog(Catalog::new(options), source)
    }

    pub fn from_catalog(catalog: Catalog, source: S) -> Self {
        Self {
            catalog,
            source,
            debouncer: KeywordDebouncer::default(),
        }
    }

    #[must_use]
    pub fn with_debouncer(mut self, debouncer: KeywordDebouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn debouncer(&self) -> &KeywordDebouncer {
        &self.debouncer
    }

    pub fn into_parts(self) -> (Catalog, S) {
        (self.catalog, self.source)
    }

    /// Runs one fetch cycle against the source.
    ///
    /// Failures are logged with their detail; the catalog only receives the user-facing
    /// message.
    pub fn fetch(&mut self, now_ms: u64) -> FetchOutcome {
        if !self.catalog.has_more_to_fetch() {
            atrace!("Controller::fetch skipped: source exhausted");
            return FetchOutcome::Skipped;
        }
        if !self.catalog.begin_fetch() {
            return FetchOutcome::Skipped;
        }

        match self.source.fetch() {
            Ok(batch) => {
                let received = batch.len();
                self.catalog.complete_fetch(batch, now_ms);
                if received == 0 {
                    FetchOutcome::Exhausted
                } else {
                    FetchOutcome::Appended(received)
                }
            }
            Err(err) => {
                awarn!(
                    error = %err,
                    retryable = err.is_retryable(),
                    fetch_index = self.catalog.fetch_count(),
                    "Controller::fetch failed"
                );
                self.catalog.fail_fetch(err.user_message());
                FetchOutcome::Failed
            }
        }
    }

    /// Call this when the "load more" sentinel becomes visible.
    ///
    /// Grows the displayed window when more filtered items exist, then fetches if the catalog
    /// is running low.
    pub fn on_sentinel_visible(&mut self, now_ms: u64) -> FetchOutcome {
        if self.catalog.has_more_displayed() {
            self.catalog.load_more_displayed();
        }
        if self.catalog.should_fetch_more() {
            self.fetch(now_ms)
        } else {
            FetchOutcome::Skipped
        }
    }

    /// Records search input; the keyword is applied by a later [`tick`](Self::tick).
    pub fn on_search_input(&mut self, text: impl Into<String>, now_ms: u64) {
        self.debouncer.on_input(text, now_ms);
    }

    /// Applies the debounced keyword once due.
    ///
    /// Returns `true` when the catalog's filters changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.debouncer.tick(now_ms) {
            Some(keyword) => self.apply_keyword(keyword),
            None => false,
        }
    }

    /// Applies any pending keyword immediately.
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(keyword) => self.apply_keyword(keyword),
            None => false,
        }
    }

    fn apply_keyword(&mut self, keyword: String) -> bool {
        if keyword == self.catalog.filters().search_keyword {
            return false;
        }
        adebug!(keyword = keyword.as_str(), "Controller: search keyword applied");
        self.catalog.set_search_keyword(keyword);
        true
    }

    /// Restores filters from a URL query string.
    ///
    /// Returns `false` (and changes nothing) when the query carries no recognized filter. Any
    /// filter the query omits takes its default.
    pub fn apply_query(&mut self, query_string: &str) -> bool {
        let patch = query::decode_patch(query_string);
        if patch.is_empty() {
            return false;
        }
        let mut filters = catalog::FilterConfig::default();
        filters.merge(patch);
        self.debouncer.cancel();
        self.catalog.set_filters(filters);
        true
    }

    /// The current filters as a URL query string (without a leading `?`).
    pub fn query_string(&self) -> String {
        query::encode(self.catalog.filters())
    }
}

use alloc::sync::Arc;

use crate::FilterConfig;
use crate::catalog::Catalog;

/// A callback fired after the catalog's observable state changes.
pub type OnChangeCallback = Arc<dyn Fn(&Catalog) + Send + Sync>;

/// Items per page when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// How close the displayed window may get to the end of the filtered collection before another
/// fetch is wanted.
pub const DEFAULT_PREFETCH_THRESHOLD: usize = 20;

/// Configuration for [`crate::Catalog`].
///
/// Cheap to clone: the callback is stored in an `Arc`.
#[derive(Clone)]
pub struct CatalogOptions {
    /// Items added to the displayed window per page. Always at least 1.
    pub page_size: usize,

    /// Remaining undisplayed items at or below which [`Catalog::should_fetch_more`] becomes
    /// `true` (while more data may exist and no fetch is running).
    pub prefetch_threshold: usize,

    /// Configuration used on construction and restored by `reset_filters`.
    pub initial_filters: FilterConfig,

    /// Optional callback fired when the catalog's state changes.
    ///
    /// Use [`Catalog::batch_update`] to coalesce several changes into one call.
    pub on_change: Option<OnChangeCallback>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogOptions {
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            prefetch_threshold: DEFAULT_PREFETCH_THRESHOLD,
            initial_filters: FilterConfig::default(),
            on_change: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_prefetch_threshold(mut self, prefetch_threshold: usize) -> Self {
        self.prefetch_threshold = prefetch_threshold;
        self
    }

    pub fn with_initial_filters(mut self, initial_filters: FilterConfig) -> Self {
        self.initial_filters = initial_filters;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Catalog) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub(crate) fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

impl core::fmt::Debug for CatalogOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogOptions")
            .field("page_size", &self.page_size)
            .field("prefetch_threshold", &self.prefetch_threshold)
            .field("initial_filters", &self.initial_filters)
            .finish_non_exhaustive()
    }
}

use alloc::string::String;

use crate::FilterConfig;

/// A lightweight, serializable snapshot of what the user is looking at.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewState {
    pub filters: FilterConfig,
    pub page: usize,
}

/// A lightweight, serializable snapshot of the fetch lifecycle.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchState {
    pub fetch_count: u64,
    pub has_more_to_fetch: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            fetch_count: 0,
            has_more_to_fetch: true,
            loading: false,
            error: None,
        }
    }
}

/// A combined snapshot of view + fetch state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogState {
    pub view: ViewState,
    pub fetch: FetchState,
}

/// What a renderer should show for the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatalogStatus {
    /// A fetch is running and nothing is displayed yet (placeholder cards).
    InitialLoading,
    /// Nothing matches and nothing is loading.
    Empty,
    /// Items are displayed.
    Browsing {
        /// A fetch is running; trailing placeholders may be shown.
        loading_more: bool,
        /// The "load more" sentinel should be mounted.
        show_sentinel: bool,
    },
    /// Items are displayed and there is nothing left to display or fetch.
    EndOfResults,
}

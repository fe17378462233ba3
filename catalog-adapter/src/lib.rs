//! Adapter utilities for the `catalog` crate.
//!
//! The `catalog` crate is UI-agnostic and performs no I/O. This crate provides the
//! framework-neutral pieces an adapter needs around it:
//!
//! - The [`DataSource`] seam, with a blocking HTTP implementation (`http` feature) and a scripted
//!   in-memory one for tests and demos
//! - URL query sync of the filter configuration ([`query`])
//! - A keyword debouncer for search input
//! - A [`Controller`] wiring source, engine and scroll triggers together
//!
//! This crate is intentionally framework-agnostic (no egui/ratatui/web bindings).
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod debounce;
mod error;
#[cfg(feature = "http")]
mod http;
pub mod query;
mod source;

#[cfg(test)]
mod tests;

pub use controller::{Controller, FetchOutcome};
pub use debounce::{DEFAULT_DEBOUNCE_MS, KeywordDebouncer};
pub use error::{FETCH_FAILED_MESSAGE, FetchError, Result};
#[cfg(feature = "http")]
pub use http::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, HttpSource, HttpSourceConfig};
pub use source::{DataSource, ScriptedSource, parse_batch};

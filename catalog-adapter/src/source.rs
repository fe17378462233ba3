//! The data source seam and an in-memory implementation.

use std::collections::VecDeque;

use catalog::RawItem;

use crate::error::{FetchError, Result};

/// A parameterless, non-paginated source of item records.
///
/// Each call returns the source's current snapshot. An empty batch means the source has nothing
/// more to give; the catalog treats that as final.
pub trait DataSource {
    fn fetch(&mut self) -> Result<Vec<RawItem>>;
}

impl<S: DataSource + ?Sized> DataSource for &mut S {
    fn fetch(&mut self) -> Result<Vec<RawItem>> {
        (**self).fetch()
    }
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn fetch(&mut self) -> Result<Vec<RawItem>> {
        (**self).fetch()
    }
}

/// Decodes a response body: a JSON array of item records.
pub fn parse_batch(body: &[u8]) -> Result<Vec<RawItem>> {
    let items: Vec<RawItem> = serde_json::from_slice(body)?;
    Ok(items)
}

/// A source that replays a fixed script of responses, then reports exhaustion.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<Vec<RawItem>>>,
    calls: usize,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Result<Vec<RawItem>>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls: 0,
        }
    }

    /// Returns `snapshot` for the first `times` calls, like an endpoint serving one fixed
    /// document.
    pub fn repeating(snapshot: Vec<RawItem>, times: usize) -> Self {
        Self::new(std::iter::repeat_n(snapshot, times).map(Ok))
    }

    pub fn push_ok(&mut self, batch: Vec<RawItem>) {
        self.script.push_back(Ok(batch));
    }

    pub fn push_err(&mut self, err: FetchError) {
        self.script.push_back(Err(err));
    }

    /// Number of `fetch` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DataSource for ScriptedSource {
    fn fetch(&mut self) -> Result<Vec<RawItem>> {
        self.calls += 1;
        self.script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::{ItemId, RawItem};

#[cfg(feature = "std")]
pub(crate) type KeyIndexMap<K> = HashMap<K, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyIndexMap<K> = BTreeMap<K, usize>;

/// Builds the id for one occurrence of `raw` in a fetched batch.
///
/// The id is `{base}-{fetch_index}-{position}-{now_ms}` where `base` is the source id, else the
/// title, else the position. The last three `-`-separated fields are plain numbers, so two ids
/// are equal only if fetch index, position and timestamp all match. Within one catalog the fetch
/// index never repeats, which makes every synthesized id unique.
pub fn synthesize_id(raw: &RawItem, fetch_index: u64, position: usize, now_ms: u64) -> ItemId {
    let base = match (raw.id.as_deref(), raw.title.as_deref()) {
        (Some(id), _) if !id.is_empty() => String::from(id),
        (_, Some(title)) if !title.is_empty() => String::from(title),
        _ => format!("{position}"),
    };
    ItemId(format!("{base}-{fetch_index}-{position}-{now_ms}"))
}

/// Maps every id handed out so far to its master index.
#[derive(Clone, Debug, Default)]
pub(crate) struct IdIndex {
    index: KeyIndexMap<ItemId>,
}

impl IdIndex {
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn get(&self, id: &ItemId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn insert(&mut self, id: ItemId, master_index: usize) {
        let prev = self.index.insert(id, master_index);
        if prev.is_some() {
            cwarn!(master_index, "IdIndex: duplicate item id");
        }
        debug_assert!(prev.is_none(), "IdIndex: duplicate item id");
    }
}

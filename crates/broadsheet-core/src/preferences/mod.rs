//! Per-actor favorites and hidden lists.
//!
//! Records are persisted through a [`PreferenceSlot`] with read-modify-write and
//! no version check. Two readers open for the same actor race, and the last
//! write wins. This assumes one active reader per actor.

mod memory;
mod metadata_slot;


use std::collections::BTreeSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{ActorKey, PageId};

pub use memory::MemorySlot;
pub use metadata_slot::MetadataPageSlot;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceList {
    Favorites,
    Hidelist,
}

impl PreferenceList {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Favorites => Self::Hidelist,
            Self::Hidelist => Self::Favorites,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::Hidelist => "hidelist",
        }
    }
}

/// Favorites and hidden pages for one actor. A page is never in both lists.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PreferenceRecord {
    favorites: BTreeSet<PageId>,
    hidelist: BTreeSet<PageId>,
}

impl PreferenceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, list: PreferenceList) -> &BTreeSet<PageId> {
        match list {
            PreferenceList::Favorites => &self.favorites,
            PreferenceList::Hidelist => &self.hidelist,
        }
    }

    fn list_mut(&mut self, list: PreferenceList) -> &mut BTreeSet<PageId> {
        match list {
            PreferenceList::Favorites => &mut self.favorites,
            PreferenceList::Hidelist => &mut self.hidelist,
        }
    }

    pub fn contains(&self, list: PreferenceList, page: &PageId) -> bool {
        self.list(list).contains(page)
    }

    pub fn is_favorite(&self, page: &PageId) -> bool {
        self.contains(PreferenceList::Favorites, page)
    }

    pub fn is_hidden(&self, page: &PageId) -> bool {
        self.contains(PreferenceList::Hidelist, page)
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty() && self.hidelist.is_empty()
    }

    pub fn remove(&mut self, list: PreferenceList, page: &PageId) -> bool {
        self.list_mut(list).remove(page)
    }

    /// Clear the page from the opposite list, then flip its membership in `list`.
    pub fn toggle(&mut self, list: PreferenceList, page: &PageId) {
        self.remove(list.opposite(), page);
        if !self.remove(list, page) {
            self.list_mut(list).insert(page.clone());
        }
    }
}

/// Stored flag payload, one per actor.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PreferencePayload {
    pub actoruuid: String,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub hidelist: Vec<String>,
}

impl PreferencePayload {
    pub fn from_record(actor: &ActorKey, record: &PreferenceRecord) -> Self {
        let ids = |list: PreferenceList| -> Vec<String> {
            record
                .list(list)
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect()
        };
        Self {
            actoruuid: actor.as_str().to_owned(),
            favorites: ids(PreferenceList::Favorites),
            hidelist: ids(PreferenceList::Hidelist),
        }
    }

    /// Lists that are missing or not string arrays come back empty.
    pub fn from_value(actor: &ActorKey, value: &Value) -> Self {
        let strings = |field: &str| -> Vec<String> {
            match value.get(field) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect(),
                _ => Vec::new(),
            }
        };
        let actoruuid = value
            .get("actoruuid")
            .and_then(Value::as_str)
            .unwrap_or(actor.as_str())
            .to_owned();

        Self {
            actoruuid,
            favorites: strings("favorites"),
            hidelist: strings("hidelist"),
        }
    }

    pub fn into_record(self) -> PreferenceRecord {
        let mut record = PreferenceRecord::new();
        record.favorites = self.favorites.into_iter().map(PageId::new).collect();
        // Stored data written elsewhere may break exclusivity; favorites win.
        record.hidelist = self
            .hidelist
            .into_iter()
            .map(PageId::new)
            .filter(|id| !record.favorites.contains(id))
            .collect();
        record
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SlotError {
    #[error("metadata page is missing")]
    MissingMetadataPage,
    #[error("viewer may not create the metadata page")]
    PermissionDenied,
    #[error("store failure: {0}")]
    Store(String),
    #[error("preference payload could not be encoded: {0}")]
    Encode(String),
}

/// Keyed persistence for preference records.
pub trait PreferenceSlot {
    fn get(&mut self, key: &ActorKey) -> Result<Option<PreferenceRecord>, SlotError>;
    fn put(&mut self, key: &ActorKey, record: &PreferenceRecord) -> Result<(), SlotError>;
}

/// Read an actor's record, falling back to an empty one on any failure.
pub fn load_preferences<S>(slot: &mut S, key: &ActorKey) -> PreferenceRecord
where
    S: PreferenceSlot + ?Sized,
{
    match slot.get(key) {
        Ok(Some(record)) => record,
        Ok(None) => PreferenceRecord::new(),
        Err(err) => {
            warn!("prefs: read failed actor={} err={}", key, err);
            PreferenceRecord::new()
        }
    }
}

/// Toggle `page` in `list` for `key` and persist the result.
pub fn toggle_preference<S>(
    slot: &mut S,
    key: &ActorKey,
    list: PreferenceList,
    page: &PageId,
) -> Result<PreferenceRecord, SlotError>
where
    S: PreferenceSlot + ?Sized,
{
    let mut record = slot.get(key)?.unwrap_or_default();
    record.toggle(list, page);
    slot.put(key, &record)?;
    debug!(
        "prefs: toggled actor={} list={} page={} favorites={} hidden={}",
        key,
        list.as_str(),
        page,
        record.list(PreferenceList::Favorites).len(),
        record.list(PreferenceList::Hidelist).len()
    );
    Ok(record)
}

use std::collections::HashMap;

use super::{PreferenceRecord, PreferenceSlot, SlotError};
use crate::document::ActorKey;

/// Process-local slot, handy as a test double.
#[derive(Debug, Default)]
pub struct MemorySlot {
    records: HashMap<ActorKey, PreferenceRecord>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceSlot for MemorySlot {
    fn get(&mut self, key: &ActorKey) -> Result<Option<PreferenceRecord>, SlotError> {
        Ok(self.records.get(key).cloned())
    }

    fn put(&mut self, key: &ActorKey, record: &PreferenceRecord) -> Result<(), SlotError> {
        self.records.insert(key.clone(), record.clone());
        Ok(())
    }
}

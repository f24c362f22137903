use log::{debug, info, warn};
use serde_json::Value;

use super::{PreferencePayload, PreferenceRecord, PreferenceSlot, SlotError};
use crate::document::{
    ActorKey, Document, DocumentId, DocumentStore, Page, PageDraft, PermissionLevel, Viewer,
};

/// Preference slot backed by flags on a document's reserved metadata page.
pub struct MetadataPageSlot<'a, DS>
where
    DS: DocumentStore,
{
    store: &'a mut DS,
    document: DocumentId,
    page: Page,
    scope: &'a str,
}

impl<'a, DS> MetadataPageSlot<'a, DS>
where
    DS: DocumentStore,
{
    /// Bind to an existing metadata page; never creates one.
    pub fn open_existing(
        store: &'a mut DS,
        document: &Document,
        scope: &'a str,
    ) -> Result<Self, SlotError> {
        let page = document
            .metadata_page()
            .cloned()
            .ok_or(SlotError::MissingMetadataPage)?;
        Ok(Self {
            store,
            document: document.uuid.clone(),
            page,
            scope,
        })
    }

    /// Bind to the metadata page, creating it when a privileged viewer needs it.
    ///
    /// Privileged viewers also raise the page's default visibility to owner so
    /// every player can write their own flag.
    pub fn open_or_create<V>(
        store: &'a mut DS,
        document: &Document,
        viewer: &V,
        scope: &'a str,
    ) -> Result<Self, SlotError>
    where
        V: Viewer + ?Sized,
    {
        let page = match document.metadata_page() {
            Some(page) => page.clone(),
            None if viewer.is_privileged() => {
                let page = store
                    .create_page(&document.uuid, PageDraft::metadata())
                    .map_err(|err| SlotError::Store(format!("{err:?}")))?;
                info!(
                    "prefs: created metadata page document={} page={}",
                    document.uuid, page.id
                );
                page
            }
            None => {
                debug!(
                    "prefs: metadata page absent document={} user={} status=not_privileged",
                    document.uuid,
                    viewer.user_id()
                );
                return Err(SlotError::PermissionDenied);
            }
        };

        let mut slot = Self {
            store,
            document: document.uuid.clone(),
            page,
            scope,
        };
        if viewer.is_privileged() {
            slot.elevate_visibility();
        }
        Ok(slot)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    fn elevate_visibility(&mut self) {
        if self.page.ownership.default == PermissionLevel::Owner {
            return;
        }

        match self.store.set_default_permission(
            &self.document,
            &self.page.id,
            PermissionLevel::Owner,
        ) {
            Ok(()) => self.page.ownership.default = PermissionLevel::Owner,
            Err(err) => warn!(
                "prefs: elevate metadata visibility failed document={} err={:?}",
                self.document, err
            ),
        }
    }
}

impl<DS> PreferenceSlot for MetadataPageSlot<'_, DS>
where
    DS: DocumentStore,
{
    fn get(&mut self, key: &ActorKey) -> Result<Option<PreferenceRecord>, SlotError> {
        Ok(self
            .page
            .flag(self.scope, key.as_str())
            .map(|value| PreferencePayload::from_value(key, value).into_record()))
    }

    fn put(&mut self, key: &ActorKey, record: &PreferenceRecord) -> Result<(), SlotError> {
        let payload = PreferencePayload::from_record(key, record);
        let value: Value =
            serde_json::to_value(&payload).map_err(|err| SlotError::Encode(err.to_string()))?;
        self.store
            .write_flag(
                &self.document,
                &self.page.id,
                self.scope,
                key.as_str(),
                value.clone(),
            )
            .map_err(|err| SlotError::Store(format!("{err:?}")))?;
        self.page.set_flag(self.scope, key.as_str(), value);
        Ok(())
    }
}

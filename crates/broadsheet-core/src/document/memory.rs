use core::cell::RefCell;

use serde_json::Value;

use super::{Document, DocumentId, DocumentStore, Page, PageDraft, PageId, PermissionLevel};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("unknown document {0}")]
    UnknownDocument(String),
    #[error("unknown page {0}")]
    UnknownPage(String),
    #[error("write rejected by store")]
    Rejected,
}

/// In-memory document store used for tests and bring-up.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Vec<Document>,
    warm_cache: bool,
    reject_writes: bool,
    lookups: RefCell<Vec<DocumentId>>,
    write_attempts: usize,
    next_page_seq: u32,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    /// Answer lookups through `cached_document` instead of `load_document`.
    pub fn with_warm_cache(mut self, warm: bool) -> Self {
        self.warm_cache = warm;
        self
    }

    /// Make every create/update call fail.
    pub fn with_rejected_writes(mut self, reject: bool) -> Self {
        self.reject_writes = reject;
        self
    }

    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|document| &document.uuid == id)
    }

    /// How often `id` was resolved, cached or loaded.
    pub fn resolutions(&self, id: &DocumentId) -> usize {
        self.lookups.borrow().iter().filter(|seen| *seen == id).count()
    }

    /// Create/update calls received, including rejected ones.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts
    }

    fn document_mut(&mut self, id: &DocumentId) -> Result<&mut Document, MemoryStoreError> {
        self.documents
            .iter_mut()
            .find(|document| &document.uuid == id)
            .ok_or_else(|| MemoryStoreError::UnknownDocument(id.to_string()))
    }

    fn page_mut(
        &mut self,
        document: &DocumentId,
        page: &PageId,
    ) -> Result<&mut Page, MemoryStoreError> {
        self.document_mut(document)?
            .page_mut(page)
            .ok_or_else(|| MemoryStoreError::UnknownPage(page.to_string()))
    }

    fn check_writable(&mut self) -> Result<(), MemoryStoreError> {
        self.write_attempts += 1;
        if self.reject_writes {
            return Err(MemoryStoreError::Rejected);
        }
        Ok(())
    }

    fn lookup(&self, id: &DocumentId) -> Option<Document> {
        self.lookups.borrow_mut().push(id.clone());
        self.document(id).cloned()
    }
}

impl DocumentStore for MemoryDocumentStore {
    type Error = MemoryStoreError;

    fn cached_document(&self, id: &DocumentId) -> Option<Document> {
        if self.warm_cache { self.lookup(id) } else { None }
    }

    fn load_document(&mut self, id: &DocumentId) -> Result<Option<Document>, Self::Error> {
        Ok(self.lookup(id))
    }

    fn create_page(
        &mut self,
        document: &DocumentId,
        draft: PageDraft,
    ) -> Result<Page, Self::Error> {
        self.check_writable()?;
        self.next_page_seq += 1;
        let id = format!("mem-page-{:04}", self.next_page_seq);

        let target = self.document_mut(document)?;
        let sort = target
            .pages
            .iter()
            .map(|page| page.sort)
            .max()
            .map_or(0, |max| max + 1);
        let mut page = Page::new(id, draft.name, sort).with_content(draft.content);
        page.ownership.default = draft.default_permission;
        target.pages.push(page.clone());
        Ok(page)
    }

    fn set_default_permission(
        &mut self,
        document: &DocumentId,
        page: &PageId,
        level: PermissionLevel,
    ) -> Result<(), Self::Error> {
        self.check_writable()?;
        self.page_mut(document, page)?.ownership.default = level;
        Ok(())
    }

    fn write_flag(
        &mut self,
        document: &DocumentId,
        page: &PageId,
        scope: &str,
        key: &str,
        value: Value,
    ) -> Result<(), Self::Error> {
        self.check_writable()?;
        self.page_mut(document, page)?.set_flag(scope, key, value);
        Ok(())
    }
}

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use broadsheet_core::document::{
    Document, DocumentId, DocumentStore, Page, PageDraft, PageId, PermissionLevel,
};
use log::{debug, info};
use rand::{Rng, RngCore, SeedableRng, distributions::Alphanumeric, rngs::StdRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const PAGE_ID_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive io failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("archive {path} is not valid json: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown document {0}")]
    UnknownDocument(DocumentId),
    #[error("unknown page {page} in document {document}")]
    UnknownPage { document: DocumentId, page: PageId },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct ArchiveFile {
    #[serde(default)]
    documents: Vec<Document>,
}

/// Document store backed by one JSON file. Writes are staged on a copy of the
/// archive and only become visible once that copy is on disk.
#[derive(Debug)]
pub struct JsonArchiveStore<R = StdRng> {
    path: PathBuf,
    archive: ArchiveFile,
    rng: R,
}

impl ArchiveFile {
    fn document_mut(&mut self, id: &DocumentId) -> Result<&mut Document, ArchiveError> {
        self.documents
            .iter_mut()
            .find(|document| &document.uuid == id)
            .ok_or_else(|| ArchiveError::UnknownDocument(id.clone()))
    }

    fn page_mut(&mut self, document: &DocumentId, page: &PageId) -> Result<&mut Page, ArchiveError> {
        self.document_mut(document)?
            .page_mut(page)
            .ok_or_else(|| ArchiveError::UnknownPage {
                document: document.clone(),
                page: page.clone(),
            })
    }
}

impl JsonArchiveStore<StdRng> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        Self::open_with_rng(path, StdRng::from_entropy())
    }
}

impl<R> JsonArchiveStore<R>
where
    R: RngCore,
{
    /// Open the archive at `path`, drawing new page ids from `rng`.
    pub fn open_with_rng(path: impl Into<PathBuf>, rng: R) -> Result<Self, ArchiveError> {
        let path = path.into();
        let raw = fs::read_to_string(&path).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        let archive: ArchiveFile =
            serde_json::from_str(&raw).map_err(|source| ArchiveError::Json {
                path: path.clone(),
                source,
            })?;
        info!(
            "archive: opened path={} documents={}",
            path.display(),
            archive.documents.len()
        );

        Ok(Self { path, archive, rng })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn documents(&self) -> &[Document] {
        &self.archive.documents
    }

    fn fresh_page_id(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(PAGE_ID_LEN)
            .map(char::from)
            .collect()
    }

    /// Persist `next` through a sibling temp file, then adopt it. On error the
    /// in-memory archive is left as it was.
    fn commit(&mut self, next: ArchiveFile) -> Result<(), ArchiveError> {
        let encoded = serde_json::to_string_pretty(&next).map_err(|source| ArchiveError::Json {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.path.with_extension("json.tmp");
        let io_err = |source| ArchiveError::Io {
            path: staging.clone(),
            source,
        };
        fs::write(&staging, encoded).map_err(io_err)?;
        fs::rename(&staging, &self.path).map_err(io_err)?;

        self.archive = next;
        debug!("archive: flushed path={}", self.path.display());
        Ok(())
    }
}

impl<R> DocumentStore for JsonArchiveStore<R>
where
    R: RngCore,
{
    type Error = ArchiveError;

    fn cached_document(&self, id: &DocumentId) -> Option<Document> {
        self.archive
            .documents
            .iter()
            .find(|document| &document.uuid == id)
            .cloned()
    }

    fn load_document(&mut self, id: &DocumentId) -> Result<Option<Document>, Self::Error> {
        Ok(self.cached_document(id))
    }

    fn create_page(&mut self, document: &DocumentId, draft: PageDraft) -> Result<Page, Self::Error> {
        let id = self.fresh_page_id();
        let mut next = self.archive.clone();
        let target = next.document_mut(document)?;
        let sort = target
            .pages
            .iter()
            .map(|page| page.sort)
            .max()
            .map_or(0, |max| max.saturating_add(1));

        let mut page = Page::new(id, draft.name, sort).with_content(draft.content);
        page.ownership.default = draft.default_permission;
        target.pages.push(page.clone());
        self.commit(next)?;
        info!(
            "archive: page created document={} page={} name={}",
            document, page.id, page.name
        );
        Ok(page)
    }

    fn set_default_permission(
        &mut self,
        document: &DocumentId,
        page: &PageId,
        level: PermissionLevel,
    ) -> Result<(), Self::Error> {
        let mut next = self.archive.clone();
        let target = next.page_mut(document, page)?;
        if target.ownership.default == level {
            return Ok(());
        }
        target.ownership.default = level;
        self.commit(next)
    }

    fn write_flag(
        &mut self,
        document: &DocumentId,
        page: &PageId,
        scope: &str,
        key: &str,
        value: Value,
    ) -> Result<(), Self::Error> {
        let mut next = self.archive.clone();
        next.page_mut(document, page)?.set_flag(scope, key, value);
        self.commit(next)
    }
}

//! Rotating advertisement snippet, picked once per reader lifetime.

use log::{debug, warn};
use rand::{Rng, RngCore};

use crate::{
    document::{DocumentId, DocumentStore},
    text_policy::{MarkupError, strip_markup},
};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AdError {
    #[error("ad source {0} not found")]
    SourceMissing(DocumentId),
    #[error("ad source {0} has no pages")]
    NoPages(DocumentId),
    #[error("ad page {0} has no text")]
    EmptyPage(String),
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error("store failure: {0}")]
    Store(String),
}

pub struct AdRotator<R> {
    source: Option<DocumentId>,
    fallback: String,
    cached: Option<String>,
    rng: R,
}

impl<R> AdRotator<R>
where
    R: RngCore,
{
    pub fn new(source: Option<DocumentId>, fallback: impl Into<String>, rng: R) -> Self {
        Self {
            source,
            fallback: fallback.into(),
            cached: None,
            rng,
        }
    }

    pub fn cached(&self) -> Option<&str> {
        self.cached.as_deref()
    }

    /// Current ad text, or `None` when no ad source is configured.
    ///
    /// The source is resolved at most once. The picked snippet, or the
    /// fallback text when picking fails, sticks for the rotator's life.
    pub fn current<DS>(&mut self, store: &mut DS) -> Option<String>
    where
        DS: DocumentStore,
    {
        let source = self.source.clone()?;
        if let Some(cached) = &self.cached {
            return Some(cached.clone());
        }

        let snippet = match self.pick(store, &source) {
            Ok(snippet) => {
                debug!("ads: cached snippet source={} len={}", source, snippet.len());
                snippet
            }
            Err(err) => {
                warn!("ads: falling back source={} err={}", source, err);
                self.fallback.clone()
            }
        };
        self.cached = Some(snippet.clone());
        Some(snippet)
    }

    fn pick<DS>(&mut self, store: &mut DS, source: &DocumentId) -> Result<String, AdError>
    where
        DS: DocumentStore,
    {
        let document = store
            .resolve_document(source)
            .map_err(|err| AdError::Store(format!("{err:?}")))?
            .ok_or_else(|| AdError::SourceMissing(source.clone()))?;
        if document.pages.is_empty() {
            return Err(AdError::NoPages(source.clone()));
        }

        let page = &document.pages[self.rng.gen_range(0..document.pages.len())];
        let snippet = strip_markup(&page.content)?;
        if snippet.is_empty() {
            return Err(AdError::EmptyPage(page.id.to_string()));
        }
        Ok(snippet)
    }
}

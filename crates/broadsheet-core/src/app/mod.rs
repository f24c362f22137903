//! Archive reader component: preferences, catalog, selection, page turns and
//! the ad slot, driven by user intents and a millisecond tick.

mod input;
mod runtime;
mod view;

#[cfg(test)]
mod tests;

use log::{debug, info, warn};
use rand::RngCore;

use crate::{
    ads::AdRotator,
    catalog::Filter,
    document::{Document, DocumentId, DocumentStore, Viewer},
    feedback::{Notifier, SoundCue},
    intents::IntentSource,
    navigation::{NavSnapshot, NavState},
    preferences::{
        MetadataPageSlot, PreferenceList, PreferenceRecord, SlotError, load_preferences,
        toggle_preference,
    },
    selection::Selection,
    settings::{LaunchError, LaunchParams, ReaderConfig},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

/// Collaborators a reader is assembled from.
pub struct ReaderParts<DS, IN, V, SC, R> {
    pub store: DS,
    pub input: IN,
    pub viewer: V,
    pub cue: SC,
    /// Random source for ad selection.
    pub rng: R,
}

pub struct NewsReader<DS, IN, V, SC, R>
where
    DS: DocumentStore,
    IN: IntentSource,
    V: Viewer,
    SC: SoundCue,
    R: RngCore,
{
    store: DS,
    input: IN,
    viewer: V,
    cue: SC,
    config: ReaderConfig,
    title: String,
    document: DocumentId,
    filter: Filter,
    nav: NavState,
    ads: AdRotator<R>,
    preferences_degraded: bool,
    pending_redraw: bool,
    closed: bool,
}

impl<DS, IN, V, SC, R> NewsReader<DS, IN, V, SC, R>
where
    DS: DocumentStore,
    IN: IntentSource,
    V: Viewer,
    SC: SoundCue,
    R: RngCore,
{
    /// Validate `params` and build the reader. A missing document id warns the
    /// user through `notifier` and no reader is created.
    pub fn open<N>(
        parts: ReaderParts<DS, IN, V, SC, R>,
        config: ReaderConfig,
        params: LaunchParams,
        notifier: &mut N,
    ) -> Result<Self, LaunchError>
    where
        N: Notifier + ?Sized,
    {
        let launch = params.validate(&config, notifier)?;
        info!(
            "reader: open document={} ads={:?} title={:?} actor={}",
            launch.document,
            launch.ads.as_ref().map(DocumentId::as_str),
            launch.title,
            parts.viewer.actor_key()
        );

        Ok(Self {
            store: parts.store,
            input: parts.input,
            viewer: parts.viewer,
            cue: parts.cue,
            ads: AdRotator::new(launch.ads, config.fallback_ad.clone(), parts.rng),
            config,
            title: launch.title,
            document: launch.document,
            filter: Filter::default(),
            nav: NavState::new(),
            preferences_degraded: false,
            pending_redraw: true,
            closed: false,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn selection(&self) -> &Selection {
        self.nav.selection()
    }

    pub fn nav_snapshot(&self) -> NavSnapshot {
        self.nav.snapshot()
    }

    pub fn is_animating(&self) -> bool {
        self.nav.is_animating()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn store(&self) -> &DS {
        &self.store
    }

    pub fn cue(&self) -> &SC {
        &self.cue
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }

    fn load_document(&mut self) -> Option<Document> {
        match self.store.resolve_document(&self.document) {
            Ok(Some(document)) => Some(document),
            Ok(None) => {
                warn!("reader: document not found document={}", self.document);
                None
            }
            Err(err) => {
                warn!(
                    "reader: document load failed document={} err={:?}",
                    self.document, err
                );
                None
            }
        }
    }

    fn preferences_for(&mut self, document: &Document) -> PreferenceRecord {
        if self.preferences_degraded {
            return PreferenceRecord::new();
        }

        let key = self.viewer.actor_key();
        match MetadataPageSlot::open_or_create(
            &mut self.store,
            document,
            &self.viewer,
            &self.config.flag_scope,
        ) {
            Ok(mut slot) => load_preferences(&mut slot, &key),
            Err(SlotError::Store(err)) => {
                warn!(
                    "prefs: metadata page unavailable for this session document={} err={}",
                    document.uuid, err
                );
                self.preferences_degraded = true;
                PreferenceRecord::new()
            }
            Err(err) => {
                debug!("prefs: using empty record actor={} reason={}", key, err);
                PreferenceRecord::new()
            }
        }
    }

    fn toggle_selected(&mut self, list: PreferenceList) {
        let Some(page) = self.nav.selection().selected.clone() else {
            debug!("prefs: toggle ignored list={} status=no_selection", list.as_str());
            return;
        };
        if self.preferences_degraded {
            debug!("prefs: toggle ignored list={} status=degraded", list.as_str());
            return;
        }
        let Some(document) = self.load_document() else {
            return;
        };

        let key = self.viewer.actor_key();
        match MetadataPageSlot::open_existing(&mut self.store, &document, &self.config.flag_scope)
        {
            Ok(mut slot) => {
                if let Err(err) = toggle_preference(&mut slot, &key, list, &page) {
                    warn!(
                        "prefs: toggle failed actor={} list={} page={} err={}",
                        key,
                        list.as_str(),
                        page,
                        err
                    );
                }
            }
            Err(err) => debug!(
                "prefs: toggle skipped actor={} list={} reason={}",
                key,
                list.as_str(),
                err
            ),
        }
        self.pending_redraw = true;
    }
}

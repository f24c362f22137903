use log::{debug, warn};
use rand::RngCore;

use super::NewsReader;
use crate::{
    catalog::{Filter, catalog, page_order},
    document::{DocumentStore, PageId, Viewer},
    feedback::SoundCue,
    intents::{IntentSource, ReaderIntent},
    navigation::{NavEvent, reduce},
    preferences::PreferenceList,
};

impl<DS, IN, V, SC, R> NewsReader<DS, IN, V, SC, R>
where
    DS: DocumentStore,
    IN: IntentSource,
    V: Viewer,
    SC: SoundCue,
    R: RngCore,
{
    /// Handle one intent. Closed readers ignore everything.
    pub fn apply_intent(&mut self, intent: ReaderIntent, now_ms: u64) {
        if self.closed {
            debug!("reader: intent ignored status=closed intent={:?}", intent);
            return;
        }

        match intent {
            ReaderIntent::ChangeFilter(filter) => self.change_filter(filter),
            ReaderIntent::ChangePage(target) => self.change_page(&target, now_ms),
            ReaderIntent::ToggleFavorite => self.toggle_selected(PreferenceList::Favorites),
            ReaderIntent::ToggleHidden => self.toggle_selected(PreferenceList::Hidelist),
        }
    }

    pub(super) fn process_intents(&mut self, now_ms: u64) {
        loop {
            match self.input.poll_intent() {
                Ok(Some(intent)) => self.apply_intent(intent, now_ms),
                Ok(None) => break,
                Err(_) => {
                    warn!("reader: intent source failed");
                    break;
                }
            }
        }
    }

    /// The selection is left alone; the next context rebuild keeps it when it
    /// is still listed and falls back to the first entry otherwise.
    fn change_filter(&mut self, filter: Filter) {
        debug!(
            "reader: filter {}->{}",
            self.filter.as_str(),
            filter.as_str()
        );
        self.filter = filter;
        self.pending_redraw = true;
    }

    fn change_page(&mut self, target: &PageId, now_ms: u64) {
        if !self.nav.accepts(target) {
            debug!(
                "ui-nav: page change dropped target={} animating={}",
                target,
                self.nav.is_animating()
            );
            return;
        }
        let Some(document) = self.load_document() else {
            return;
        };

        // Only pages the selector currently offers can be turned to.
        let preferences = self.preferences_for(&document);
        let listed = catalog(&document, &preferences, self.filter, &self.viewer);
        if !listed.iter().any(|page| &page.id == target) {
            debug!(
                "ui-nav: page change dropped target={} filter={} status=not_listed",
                target,
                self.filter.as_str()
            );
            return;
        }

        let order = page_order(&document, &self.viewer);
        let effects = reduce(
            &mut self.nav,
            NavEvent::Navigate {
                target,
                order: &order,
            },
            now_ms,
            self.config.timing,
        );
        self.apply_nav_effects(effects);
    }
}

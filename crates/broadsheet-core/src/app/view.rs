use rand::RngCore;

use super::NewsReader;
use crate::{
    catalog::catalog,
    document::{DocumentStore, Viewer},
    feedback::SoundCue,
    intents::IntentSource,
    render::{ContentPage, ControlBindings, RenderContext},
};

impl<DS, IN, V, SC, R> NewsReader<DS, IN, V, SC, R>
where
    DS: DocumentStore,
    IN: IntentSource,
    V: Viewer,
    SC: SoundCue,
    R: RngCore,
{
    /// Build the snapshot for the next redraw: catalog, then selection
    /// resolution (skipped mid-turn), then preference flags, then the ad slot.
    pub fn prepare_context(&mut self) -> RenderContext {
        let document = self.load_document();
        let preferences = document
            .as_ref()
            .map(|document| self.preferences_for(document))
            .unwrap_or_default();
        let pages = document
            .as_ref()
            .map(|document| catalog(document, &preferences, self.filter, &self.viewer))
            .unwrap_or_default();

        self.nav.reconcile(&pages);
        let selection = self.nav.selection().clone();

        let (is_favorite, is_hidden) = selection
            .selected
            .as_ref()
            .map(|id| (preferences.is_favorite(id), preferences.is_hidden(id)))
            .unwrap_or((false, false));
        let content_page = selection
            .viewed
            .as_ref()
            .and_then(|id| document.as_ref()?.page(id))
            .map(ContentPage::from);
        let ad_content = if self.closed {
            self.ads.cached().map(str::to_owned)
        } else {
            self.ads.current(&mut self.store)
        };

        RenderContext {
            title: self.title.clone(),
            pages,
            selected_page_id: selection.selected.clone(),
            content_page,
            filter: self.filter,
            is_favorite,
            is_hidden,
            animation_class: self.nav.phase().animation_class(),
            ad_content,
            controls: ControlBindings {
                filter_value: self.filter,
                page_value: selection.selected,
                input_locked: self.nav.is_animating(),
            },
        }
    }
}

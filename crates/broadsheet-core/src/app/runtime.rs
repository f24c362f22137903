use log::info;
use rand::RngCore;

use super::{NewsReader, TickResult};
use crate::{
    document::{DocumentStore, Viewer},
    feedback::SoundCue,
    intents::IntentSource,
    navigation::{NavEffect, NavEffects, NavEvent, reduce},
};

impl<DS, IN, V, SC, R> NewsReader<DS, IN, V, SC, R>
where
    DS: DocumentStore,
    IN: IntentSource,
    V: Viewer,
    SC: SoundCue,
    R: RngCore,
{
    /// Drain pending intents, run due page-turn steps and report whether the
    /// surface should rebuild its context.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        if self.closed {
            return TickResult::NoRender;
        }

        self.process_intents(now_ms);
        let effects = reduce(&mut self.nav, NavEvent::Tick, now_ms, self.config.timing);
        self.apply_nav_effects(effects);

        if self.pending_redraw {
            self.pending_redraw = false;
            TickResult::RenderRequested
        } else {
            TickResult::NoRender
        }
    }

    /// When the next scheduled page-turn step falls due.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.nav.next_deadline_ms()
    }

    /// Tear the reader down. Pending page-turn steps are cancelled and later
    /// ticks and intents are ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        let _ = reduce(&mut self.nav, NavEvent::Dispose, 0, self.config.timing);
        self.closed = true;
        self.pending_redraw = false;
        info!("reader: closed document={}", self.document);
    }

    pub(super) fn apply_nav_effects(&mut self, effects: NavEffects) {
        for effect in effects {
            match effect {
                NavEffect::PlayTurnCue => {
                    if let Some(cue) = &self.config.turn_cue {
                        self.cue.play(cue);
                    }
                }
                NavEffect::RequestRender => self.pending_redraw = true,
            }
        }
    }
}

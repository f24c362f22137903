//! Two-phase page-turn state machine.
//!
//! A page change commits the selection at once, swaps the visible content after
//! `turn_out_ms`, then settles back to idle after `turn_in_ms`. The delays are
//! kept as scheduled steps with absolute deadlines; the host advances them by
//! feeding [`NavEvent::Tick`] with the current time. Disposing clears the
//! schedule so a closed reader is never mutated afterwards.


use heapless::{Deque, Vec as HeaplessVec};
use log::debug;
use serde::Serialize;

use crate::{
    catalog::PageSummary,
    document::PageId,
    selection::{Selection, resolve},
    settings::TurnTiming,
};

pub const MAX_NAV_EFFECTS: usize = 4;
const MAX_SCHEDULED_STEPS: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Back,
}

impl Direction {
    /// Back when the target sits before the current page in `order`. An unknown
    /// current page (or target) turns forward.
    pub fn between(order: &[PageId], current: Option<&PageId>, target: &PageId) -> Self {
        let position = |id: &PageId| order.iter().position(|entry| entry == id);
        match (current.and_then(position), position(target)) {
            (Some(current), Some(target)) if target < current => Self::Back,
            _ => Self::Forward,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Back => "back",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavPhase {
    Idle,
    TurningOut(Direction),
    TurningIn(Direction),
}

impl NavPhase {
    /// Animation tag the rendering surface applies to the content page.
    pub const fn animation_class(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::TurningOut(Direction::Forward) => Some("page-turn-out"),
            Self::TurningOut(Direction::Back) => Some("page-back-out"),
            Self::TurningIn(Direction::Forward) => Some("page-turn-in"),
            Self::TurningIn(Direction::Back) => Some("page-back-in"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Step {
    ArmTurnOut(Direction),
    CommitSelection,
    SwapContent(Direction),
    Settle,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ScheduledStep {
    step: Step,
    due_ms: u64,
}

/// Work the owner performs after a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavEffect {
    PlayTurnCue,
    RequestRender,
}

pub type NavEffects = HeaplessVec<NavEffect, MAX_NAV_EFFECTS>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavSnapshot {
    pub selected: Option<PageId>,
    pub viewed: Option<PageId>,
    pub phase: NavPhase,
}

#[derive(Clone, Copy, Debug)]
pub enum NavEvent<'a> {
    /// Page-change intent. `order` is the unfiltered list of readable pages.
    Navigate {
        target: &'a PageId,
        order: &'a [PageId],
    },
    /// Run every step whose deadline has passed.
    Tick,
    /// Cancel pending steps; later events are ignored.
    Dispose,
}

#[derive(Clone, Debug)]
pub struct NavState {
    phase: NavPhase,
    selection: Selection,
    target: Option<PageId>,
    animating: bool,
    schedule: Deque<ScheduledStep, MAX_SCHEDULED_STEPS>,
    disposed: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavState {
    pub fn new() -> Self {
        Self {
            phase: NavPhase::Idle,
            selection: Selection::default(),
            target: None,
            animating: false,
            schedule: Deque::new(),
            disposed: false,
        }
    }

    pub fn phase(&self) -> NavPhase {
        self.phase
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            selected: self.selection.selected.clone(),
            viewed: self.selection.viewed.clone(),
            phase: self.phase,
        }
    }

    /// Deadline of the next scheduled step, if any.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.schedule.front().map(|scheduled| scheduled.due_ms)
    }

    /// Whether a page change toward `target` would start a turn.
    pub fn accepts(&self, target: &PageId) -> bool {
        !self.disposed && !self.animating && self.selection.selected.as_ref() != Some(target)
    }

    /// Re-run selection resolution against `catalog`. Skipped mid-turn, since
    /// the turn owns the selection until it settles. Returns whether it changed.
    pub fn reconcile(&mut self, catalog: &[PageSummary]) -> bool {
        if self.animating || self.disposed {
            return false;
        }

        let next = resolve(catalog, &self.selection);
        if next == self.selection {
            return false;
        }
        debug!(
            "ui-nav: reconcile selected={:?}->{:?} viewed={:?}->{:?} catalog={}",
            self.selection.selected,
            next.selected,
            self.selection.viewed,
            next.viewed,
            catalog.len()
        );
        self.selection = next;
        true
    }

    /// Queue a page turn toward `target`. Returns `false` when the guard drops it.
    pub fn begin(
        &mut self,
        target: &PageId,
        order: &[PageId],
        now_ms: u64,
        timing: TurnTiming,
    ) -> bool {
        if !self.accepts(target) {
            debug!(
                "ui-nav: page change ignored target={} selected={:?} animating={} disposed={}",
                target, self.selection.selected, self.animating, self.disposed
            );
            return false;
        }

        let direction = Direction::between(order, self.selection.selected.as_ref(), target);
        let swap_ms = now_ms.saturating_add(timing.turn_out_ms);
        let settle_ms = swap_ms.saturating_add(timing.turn_in_ms);
        debug!(
            "ui-nav: turn begin from={:?} to={} direction={} swap_ms={} settle_ms={}",
            self.selection.selected,
            target,
            direction.as_str(),
            swap_ms,
            settle_ms
        );

        self.schedule.clear();
        for scheduled in [
            ScheduledStep {
                step: Step::ArmTurnOut(direction),
                due_ms: now_ms,
            },
            ScheduledStep {
                step: Step::CommitSelection,
                due_ms: now_ms,
            },
            ScheduledStep {
                step: Step::SwapContent(direction),
                due_ms: swap_ms,
            },
            ScheduledStep {
                step: Step::Settle,
                due_ms: settle_ms,
            },
        ] {
            let _ = self.schedule.push_back(scheduled);
        }
        self.target = Some(target.clone());
        self.animating = true;
        true
    }

    /// Apply the next step if it is due, returning its effects.
    pub fn step(&mut self, now_ms: u64) -> Option<NavEffects> {
        if self.disposed {
            return None;
        }
        let due = self.schedule.front()?.due_ms;
        if now_ms < due {
            return None;
        }
        let scheduled = self.schedule.pop_front()?;
        Some(self.apply(scheduled.step))
    }

    /// Apply every due step, merging their effects.
    pub fn advance(&mut self, now_ms: u64) -> NavEffects {
        let mut merged = NavEffects::new();
        while let Some(effects) = self.step(now_ms) {
            for effect in effects {
                if !merged.contains(&effect) {
                    let _ = merged.push(effect);
                }
            }
        }
        merged
    }

    pub fn dispose(&mut self) {
        if !self.schedule.is_empty() {
            debug!(
                "ui-nav: dispose cancelled_steps={} phase={:?}",
                self.schedule.len(),
                self.phase
            );
        }
        self.schedule.clear();
        self.disposed = true;
    }

    fn apply(&mut self, step: Step) -> NavEffects {
        let mut effects = NavEffects::new();
        match step {
            Step::ArmTurnOut(direction) => {
                self.phase = NavPhase::TurningOut(direction);
                let _ = effects.push(NavEffect::PlayTurnCue);
            }
            Step::CommitSelection => {
                self.selection.selected = self.target.clone();
                let _ = effects.push(NavEffect::RequestRender);
            }
            Step::SwapContent(direction) => {
                self.selection.viewed = self.target.clone();
                self.phase = NavPhase::TurningIn(direction);
                let _ = effects.push(NavEffect::RequestRender);
            }
            Step::Settle => {
                self.phase = NavPhase::Idle;
                self.animating = false;
                self.target = None;
                let _ = effects.push(NavEffect::RequestRender);
            }
        }
        debug!(
            "ui-nav: step={:?} selected={:?} viewed={:?} phase={:?}",
            step, self.selection.selected, self.selection.viewed, self.phase
        );
        effects
    }
}

/// Feed one event through the machine and collect the resulting effects.
pub fn reduce(
    state: &mut NavState,
    event: NavEvent<'_>,
    now_ms: u64,
    timing: TurnTiming,
) -> NavEffects {
    match event {
        NavEvent::Navigate { target, order } => {
            if state.begin(target, order, now_ms, timing) {
                state.advance(now_ms)
            } else {
                NavEffects::new()
            }
        }
        NavEvent::Tick => state.advance(now_ms),
        NavEvent::Dispose => {
            state.dispose();
            NavEffects::new()
        }
    }
}

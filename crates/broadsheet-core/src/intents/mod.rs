//! User intents delivered by the rendering surface.

mod scripted;

pub use scripted::ScriptedIntents;

use crate::{catalog::Filter, document::PageId};

/// Logical actions consumed by the reader.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReaderIntent {
    ChangeFilter(Filter),
    ChangePage(PageId),
    ToggleFavorite,
    ToggleHidden,
}

/// Polled intent provider.
pub trait IntentSource {
    type Error;

    fn poll_intent(&mut self) -> Result<Option<ReaderIntent>, Self::Error>;
}

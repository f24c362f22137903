use std::collections::VecDeque;

use super::{IntentSource, ReaderIntent};

/// Queue of intents replayed in order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedIntents {
    queue: VecDeque<ReaderIntent>,
}

impl ScriptedIntents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: ReaderIntent) {
        self.queue.push_back(intent);
    }
}

impl FromIterator<ReaderIntent> for ScriptedIntents {
    fn from_iter<I: IntoIterator<Item = ReaderIntent>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

impl IntentSource for ScriptedIntents {
    type Error = core::convert::Infallible;

    fn poll_intent(&mut self) -> Result<Option<ReaderIntent>, Self::Error> {
        Ok(self.queue.pop_front())
    }
}

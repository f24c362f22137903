//! Side channels toward the user: sound cues and notifications.

#[cfg(test)]
pub(crate) mod mock;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioCue {
    pub src: String,
    pub volume: f32,
    #[serde(default)]
    pub looped: bool,
}

impl AudioCue {
    /// Non-looping cue.
    pub fn once(src: impl Into<String>, volume: f32) -> Self {
        Self {
            src: src.into(),
            volume,
            looped: false,
        }
    }
}

/// Plays sound cues.
pub trait SoundCue {
    fn play(&mut self, cue: &AudioCue);
}

/// User-facing notification sink.
pub trait Notifier {
    fn warn(&mut self, message: &str);
}

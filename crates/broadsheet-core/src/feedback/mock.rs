use super::{AudioCue, Notifier, SoundCue};

/// Keeps every cue it is asked to play.
#[derive(Clone, Debug, Default)]
pub struct RecordingCue {
    pub played: Vec<AudioCue>,
}

impl SoundCue for RecordingCue {
    fn play(&mut self, cue: &AudioCue) {
        self.played.push(cue.clone());
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    pub warnings: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_owned());
    }
}

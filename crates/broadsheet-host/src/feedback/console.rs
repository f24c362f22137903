use broadsheet_core::feedback::{AudioCue, Notifier, SoundCue};
use log::{info, warn};

/// Reports cues through the log instead of an audio device.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSoundCue {
    played: u32,
}

impl LogSoundCue {
    pub fn played(&self) -> u32 {
        self.played
    }
}

impl SoundCue for LogSoundCue {
    fn play(&mut self, cue: &AudioCue) {
        self.played = self.played.saturating_add(1);
        info!(
            "sound: play src={} volume={:.2} looped={}",
            cue.src, cue.volume, cue.looped
        );
    }
}

#[derive(Clone, Debug, Default)]
pub struct LogNotifier {
    warnings: Vec<String>,
}

impl LogNotifier {
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Notifier for LogNotifier {
    fn warn(&mut self, message: &str) {
        warn!("notify: {}", message);
        self.warnings.push(message.to_owned());
    }
}

mod console;

pub use console::{LogNotifier, LogSoundCue};

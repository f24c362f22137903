//! Reader configuration and launch parameters.

use serde::{Deserialize, Serialize};

use crate::{
    document::DocumentId,
    feedback::{AudioCue, Notifier},
};

pub const DEFAULT_TITLE: &str = "📰 Arkham Advertiser";
pub const DEFAULT_FLAG_SCOPE: &str = "md-madness";
pub const DEFAULT_TURN_CUE: &str = "modules/md-madness/assets/sfx/paperflip.mp3";
pub const DEFAULT_TURN_CUE_VOLUME: f32 = 0.5;
pub const FALLBACK_AD: &str = "Advertise here! Contact the newsroom.";

/// Delays bracketing the content swap of a page turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnTiming {
    /// From committing the selection to swapping the content.
    pub turn_out_ms: u64,
    /// From swapping the content to settling back to idle.
    pub turn_in_ms: u64,
}

impl Default for TurnTiming {
    fn default() -> Self {
        Self {
            turn_out_ms: 450,
            turn_in_ms: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub default_title: String,
    /// Flag scope the preference payloads are stored under.
    pub flag_scope: String,
    pub turn_cue: Option<AudioCue>,
    pub timing: TurnTiming,
    pub fallback_ad: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_owned(),
            flag_scope: DEFAULT_FLAG_SCOPE.to_owned(),
            turn_cue: Some(AudioCue::once(DEFAULT_TURN_CUE, DEFAULT_TURN_CUE_VOLUME)),
            timing: TurnTiming::default(),
            fallback_ad: FALLBACK_AD.to_owned(),
        }
    }
}

/// Parameters the reader is opened with.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LaunchParams {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    /// Secondary document advertisements are drawn from.
    #[serde(default)]
    pub ads: Option<String>,
}

/// Launch parameters after validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReaderLaunch {
    pub title: String,
    pub document: DocumentId,
    pub ads: Option<DocumentId>,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LaunchError {
    #[error("no document id was provided for the reader")]
    MissingDocumentId,
}

impl LaunchParams {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_ads(mut self, ads: impl Into<String>) -> Self {
        self.ads = Some(ads.into());
        self
    }

    /// A missing or blank `uuid` warns the user and aborts the launch.
    pub fn validate<N>(
        self,
        config: &ReaderConfig,
        notifier: &mut N,
    ) -> Result<ReaderLaunch, LaunchError>
    where
        N: Notifier + ?Sized,
    {
        let Some(uuid) = self.uuid.filter(|uuid| !uuid.trim().is_empty()) else {
            let err = LaunchError::MissingDocumentId;
            notifier.warn(&err.to_string());
            return Err(err);
        };

        Ok(ReaderLaunch {
            title: self
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| config.default_title.clone()),
            document: DocumentId::new(uuid),
            ads: self
                .ads
                .filter(|ads| !ads.trim().is_empty())
                .map(DocumentId::new),
        })
    }
}

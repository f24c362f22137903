use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use broadsheet_core::{
    app::{NewsReader, ReaderParts, TickResult},
    document::{DocumentStore, SessionViewer},
    feedback::SoundCue,
    intents::ScriptedIntents,
    render::RenderContext,
    settings::{LaunchParams, ReaderConfig},
};
use broadsheet_host::{
    feedback::{LogNotifier, LogSoundCue},
    storage::JsonArchiveStore,
};
use clap::Parser;
use log::{LevelFilter, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use script::ScriptStep;

#[path = "main/script.rs"]
mod script;

/// Replay a reading session against a JSON archive and print every render
/// context as one JSON line.
#[derive(Debug, Parser)]
#[command(name = "broadsheet", version)]
struct Args {
    /// JSON archive holding the documents.
    #[arg(long)]
    archive: PathBuf,
    /// Document to read.
    #[arg(long)]
    uuid: Option<String>,
    /// Document advertisements are drawn from.
    #[arg(long)]
    ads: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long, default_value = "User.player")]
    user: String,
    /// Character preferences are stored under instead of the user.
    #[arg(long)]
    character: Option<String>,
    /// Open as a gamemaster.
    #[arg(long)]
    gm: bool,
    /// Session script; without it only the opening context is printed.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Seed for ad selection.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn viewer(&self) -> SessionViewer {
        let viewer = if self.gm {
            SessionViewer::gamemaster(self.user.clone())
        } else {
            SessionViewer::player(self.user.clone())
        };
        match &self.character {
            Some(character) => viewer.with_character(character.clone()),
            None => viewer,
        }
    }

    fn launch_params(&self) -> LaunchParams {
        LaunchParams {
            title: self.title.clone(),
            uuid: self.uuid.clone(),
            ads: self.ads.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderLine<'a> {
    at_ms: u64,
    context: &'a RenderContext,
}

type HostReader = NewsReader<
    JsonArchiveStore,
    ScriptedIntents,
    SessionViewer,
    LogSoundCue,
    ChaCha8Rng,
>;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    let args = Args::parse();

    let steps = match &args.script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            script::parse(&source)?
        }
        None => Vec::new(),
    };
    let store = JsonArchiveStore::open(&args.archive)?;
    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let parts = ReaderParts {
        store,
        input: ScriptedIntents::new(),
        viewer: args.viewer(),
        cue: LogSoundCue::default(),
        rng,
    };
    let mut notifier = LogNotifier::default();
    let mut reader: HostReader = NewsReader::open(
        parts,
        ReaderConfig::default(),
        args.launch_params(),
        &mut notifier,
    )
    .context("opening reader")?;

    let mut now_ms = 0u64;
    render_if_requested(&mut reader, now_ms)?;
    for step in steps {
        match step {
            ScriptStep::Intent(intent) => reader.input_mut().push(intent),
            ScriptStep::Wait(ms) => {
                let until = now_ms.saturating_add(ms);
                while let Some(deadline) = reader.next_deadline_ms()
                    && deadline <= until
                {
                    now_ms = now_ms.max(deadline);
                    render_if_requested(&mut reader, now_ms)?;
                }
                now_ms = until;
            }
        }
        render_if_requested(&mut reader, now_ms)?;
    }

    reader.close();
    info!(
        "session: done at_ms={} cues={} documents={}",
        now_ms,
        reader.cue().played(),
        reader.store().documents().len()
    );
    Ok(())
}

fn render_if_requested<DS, SC>(
    reader: &mut NewsReader<DS, ScriptedIntents, SessionViewer, SC, ChaCha8Rng>,
    now_ms: u64,
) -> Result<()>
where
    DS: DocumentStore,
    SC: SoundCue,
{
    if reader.tick(now_ms) == TickResult::NoRender {
        return Ok(());
    }
    let context = reader.prepare_context();
    let line = serde_json::to_string(&RenderLine {
        at_ms: now_ms,
        context: &context,
    })?;
    println!("{line}");
    Ok(())
}

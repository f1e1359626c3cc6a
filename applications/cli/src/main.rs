/// Soundshelf CLI - library search, upload checks, scripted playback
use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_cli::{config::AppConfig, upload, ScriptRunner, Step};
use shelf_core::{library::filter_tracks, Track};
use shelf_playback::{
    Action, JsonFilePreferences, MemoryPreferences, PlayerSession, PreferenceStore,
    SimulatedBackend,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Soundshelf music library and player driver", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./shelf.toml when present)
    #[arg(short, long, global = true, env = "SHELF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an upload before it is stored
    ValidateUpload {
        /// Track title
        #[arg(short, long, default_value = "")]
        title: String,
        /// Track artist
        #[arg(short, long, default_value = "")]
        artist: String,
        /// Audio file
        #[arg(long)]
        audio: Option<PathBuf>,
        /// Cover image
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Search a library file by title or artist
    Search {
        /// JSON file containing an array of tracks
        #[arg(short, long)]
        library: PathBuf,
        /// Case-insensitive search text
        query: String,
    },
    /// Run a scripted playback session and print the final player state
    Play {
        /// JSON file containing an array of tracks
        #[arg(short, long)]
        library: PathBuf,
        /// Comma-separated steps, e.g. "advance:30,next,key:s,seek:12"
        #[arg(short, long, default_value = "")]
        script: String,
        /// Persist preferences to this JSON file
        #[arg(short, long)]
        prefs: Option<PathBuf>,
        /// Track urls that fail to load
        #[arg(long)]
        broken: Vec<String>,
        /// Queue the library without starting playback
        #[arg(long)]
        paused: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf=info,shelf_cli=info,shelf_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::ValidateUpload {
            title,
            artist,
            audio,
            cover,
        } => validate_upload(&config, &title, &artist, audio.as_deref(), cover.as_deref()),
        Commands::Search { library, query } => search(&library, &query),
        Commands::Play {
            library,
            script,
            prefs,
            broken,
            paused,
        } => {
            let steps = Step::parse_script(&script)?;
            let tracks = load_library(&library)?;
            match prefs {
                Some(path) => {
                    let store = JsonFilePreferences::open(&path)
                        .with_context(|| format!("Failed to open preferences {}", path.display()))?;
                    play(&config, store, tracks, &steps, &broken, !paused)
                }
                None => play(&config, MemoryPreferences::new(), tracks, &steps, &broken, !paused),
            }
        }
    }
}

fn load_library(path: &Path) -> anyhow::Result<Vec<Track>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read library {}", path.display()))?;
    let tracks: Vec<Track> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse library {}", path.display()))?;
    tracing::debug!("Loaded {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

fn validate_upload(
    config: &AppConfig,
    title: &str,
    artist: &str,
    audio: Option<&Path>,
    cover: Option<&Path>,
) -> anyhow::Result<()> {
    let request = upload::build_request(title, artist, audio, cover)?;
    let validated = request.validate(&config.upload)?;
    tracing::info!(title = %validated.title, key = %validated.audio_key, "Upload accepted");

    let plan = upload::UploadPlan::from(validated);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn search(library: &Path, query: &str) -> anyhow::Result<()> {
    let tracks = load_library(library)?;
    let matches = filter_tracks(&tracks, query);
    tracing::info!("{} of {} tracks match '{}'", matches.len(), tracks.len(), query);

    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

fn play<P: PreferenceStore>(
    config: &AppConfig,
    preferences: P,
    tracks: Vec<Track>,
    steps: &[Step],
    broken: &[String],
    play_immediately: bool,
) -> anyhow::Result<()> {
    let mut backend = SimulatedBackend::default();
    for track in &tracks {
        if let Some(duration) = track.duration {
            backend.set_duration(track.audio_url.clone(), duration);
        }
    }
    for url in broken {
        backend.mark_broken(url.clone());
    }

    let mut session = PlayerSession::new(backend, preferences, &config.player);
    if !tracks.is_empty() {
        if let Err(rejection) = session.dispatch(Action::SetQueue {
            tracks,
            play_immediately,
        }) {
            tracing::warn!(reason = %rejection, "Could not queue library");
        }
    }

    let mut runner = ScriptRunner::new(session);
    runner.pump();
    runner.run_all(steps);

    for notification in runner.notifications() {
        eprintln!("{}", notification);
    }

    let session = runner.into_session();
    println!("{}", serde_json::to_string_pretty(session.state())?);
    Ok(())
}

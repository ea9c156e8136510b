use anyhow::{Context, Result};
use clap::Parser;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use voxplay_core::{AppConfig, Command, PlayerState, ProgressUpdate, UiCommand};
use voxplay_engine::SpeechEngine;
use voxplay_player::{CommandObserver, NullMediaHandle, Session, VideoSession};

#[derive(Parser)]
#[command(name = "voxplay", about = "Voice-controlled media player")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Drive a seekable video media handle instead of the audio engine
    #[arg(long)]
    video: bool,

    /// Media file to play
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load config from {:?}", cli.config))?;

    // Set up TUI log buffer and layered tracing subscriber
    let log_buffer = Arc::new(Mutex::new(VecDeque::<String>::new()));
    let tui_log_layer = voxplay_tui::TuiLogLayer::new(Arc::clone(&log_buffer), 1000);

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tui_log_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("voxplay starting");

    let engine = build_engine(&config).await?;
    let recent = Arc::new(Mutex::new(VecDeque::<String>::new()));

    if cli.video {
        run_video(&cli, &config, engine, recent, log_buffer).await
    } else {
        run_audio(&cli, &config, engine, recent, log_buffer).await
    }
}

async fn build_engine(config: &AppConfig) -> Result<Box<dyn SpeechEngine>> {
    let registry = voxplay_engine::EngineRegistry::new();
    let mut engine = registry
        .create(&config.recognizer.engine)
        .with_context(|| format!("unknown recognizer engine '{}'", config.recognizer.engine))?;

    let engine_config = match config.recognizer.vosk {
        Some(ref vosk) if config.recognizer.engine == "vosk" => {
            toml::Value::try_from(vosk).context("failed to serialize vosk config")?
        }
        _ => toml::Value::Table(Default::default()),
    };

    engine.initialize(engine_config).await.with_context(|| {
        format!(
            "failed to initialize recognizer engine '{}'",
            config.recognizer.engine
        )
    })?;

    tracing::info!("recognizer engine '{}' active", engine.name());
    Ok(engine)
}

/// Keep the last few dispatched commands around for the Player tab.
fn command_observer(recent: Arc<Mutex<VecDeque<String>>>) -> CommandObserver {
    Box::new(move |command: &Command| {
        if let Ok(mut buf) = recent.lock() {
            if buf.len() >= 10 {
                buf.pop_front();
            }
            buf.push_back(command.to_string());
        }
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn snapshot(recent: &Arc<Mutex<VecDeque<String>>>) -> Vec<String> {
    recent
        .lock()
        .map(|buf| buf.iter().cloned().collect())
        .unwrap_or_default()
}

async fn run_audio(
    cli: &Cli,
    config: &AppConfig,
    engine: Box<dyn SpeechEngine>,
    recent: Arc<Mutex<VecDeque<String>>>,
    log_buffer: Arc<Mutex<VecDeque<String>>>,
) -> Result<()> {
    let devices = voxplay_audio::DeviceManager::new();

    // Decode on a blocking worker; the UI comes up only after a
    // successful load
    tracing::info!("decoding {}", cli.file.display());
    let decode_path = cli.file.clone();
    let buffer = tokio::task::spawn_blocking(move || voxplay_audio::decode_file(&decode_path))
        .await
        .context("decode task failed")?
        .with_context(|| format!("failed to decode {}", cli.file.display()))?;
    tracing::info!(
        duration_seconds = buffer.duration_seconds(),
        sample_rate = buffer.sample_rate(),
        "loaded {}",
        cli.file.display(),
    );

    // Push-model progress: the output callback publishes the fraction,
    // label formatting happens on the broadcast task
    let (progress_tx, progress_rx) = watch::channel(0.0f32);
    let on_progress = Box::new(move |fraction: f32| {
        let _ = progress_tx.send(fraction);
    });

    let mut session = Session::start(
        &devices,
        config,
        buffer,
        engine,
        on_progress,
        command_observer(Arc::clone(&recent)),
    )
    .context("failed to start session")?;

    // Spawn state broadcast task (~30Hz)
    let (state_tx, state_rx) = watch::channel(PlayerState::default());
    let playback = session.playback().clone();
    let capture = session.capture_handle();
    let duration = playback.duration_seconds();
    let file_name = display_name(&cli.file);
    let recent_src = Arc::clone(&recent);
    let mut progress_watch = progress_rx;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(33));
        loop {
            interval.tick().await;
            let fraction = *progress_watch.borrow_and_update();
            let state = PlayerState {
                file_name: file_name.clone(),
                progress: ProgressUpdate::from_fraction(fraction, duration),
                playing: playback.is_playing(),
                at_end: playback.is_at_end(),
                capture: capture.status(),
                recent_commands: snapshot(&recent_src),
                is_running: true,
            };
            if state_tx.send(state).is_err() {
                break; // TUI closed
            }
        }
    });

    run_ui(state_rx, session.commands(), log_buffer, config).await?;

    tracing::info!("shutting down");
    session.close().await;
    Ok(())
}

async fn run_video(
    cli: &Cli,
    config: &AppConfig,
    engine: Box<dyn SpeechEngine>,
    recent: Arc<Mutex<VecDeque<String>>>,
    log_buffer: Arc<Mutex<VecDeque<String>>>,
) -> Result<()> {
    use voxplay_player::MediaHandle;

    let devices = voxplay_audio::DeviceManager::new();

    let mut media =
        NullMediaHandle::new(Duration::from_secs(config.video.simulated_duration_seconds));
    media
        .set_source(&cli.file)
        .with_context(|| format!("failed to set media source {}", cli.file.display()))?;
    if config.video.simulated_duration_seconds == 0 {
        tracing::warn!("null media backend reports zero duration, progress stays at 0%");
    }

    let (mut session, progress_rx) = VideoSession::start(
        &devices,
        config,
        Box::new(media),
        engine,
        command_observer(Arc::clone(&recent)),
    )
    .context("failed to start video session")?;

    // Spawn state broadcast task (~30Hz); progress itself is poll-driven
    // inside the session
    let (state_tx, state_rx) = watch::channel(PlayerState::default());
    let controller = session.controller();
    let capture = session.capture_handle();
    let file_name = display_name(&cli.file);
    let recent_src = Arc::clone(&recent);
    let mut progress_watch = progress_rx;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(33));
        loop {
            interval.tick().await;
            let progress = progress_watch.borrow_and_update().clone();
            let playing = controller
                .lock()
                .map(|c| c.media().is_playing())
                .unwrap_or(false);
            let state = PlayerState {
                file_name: file_name.clone(),
                progress,
                playing,
                at_end: false,
                capture: capture.status(),
                recent_commands: snapshot(&recent_src),
                is_running: true,
            };
            if state_tx.send(state).is_err() {
                break; // TUI closed
            }
        }
    });

    run_ui(state_rx, session.commands(), log_buffer, config).await?;

    tracing::info!("shutting down");
    session.close().await;
    Ok(())
}

/// Bridge TUI commands into the session's dispatch channel and run the
/// terminal event loop until the user quits.
async fn run_ui(
    state_rx: watch::Receiver<PlayerState>,
    session_commands: mpsc::UnboundedSender<Command>,
    log_buffer: Arc<Mutex<VecDeque<String>>>,
    config: &AppConfig,
) -> Result<()> {
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiCommand>();
    tokio::spawn(async move {
        while let Some(command) = ui_rx.recv().await {
            match command {
                UiCommand::Player(command) => {
                    let _ = session_commands.send(command);
                }
                UiCommand::Quit => break,
            }
        }
    });

    tracing::info!("TUI active, press 'q' to quit");
    voxplay_tui::run(
        state_rx,
        ui_tx,
        log_buffer,
        config.player.seek_step_seconds,
    )
    .await
    .context("TUI error")
}

/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::GameConfig;
use sim::session::{Command, Session};
use ui::gamepad::GamepadState;
use ui::input::{InputState, KEYS_NEW_GAME, KEYS_QUIT};
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(10);

/// Explore a random archipelago, grab the boat, collect every treasure,
/// and stay away from the zombies.
#[derive(Parser, Debug)]
#[command(name = "archipelago", version)]
struct Cli {
    /// Path to a config.toml (default: next to the binary, then CWD)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible map
    #[arg(long)]
    seed: Option<u64>,

    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Directory for the log file (default: platform cache dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = setup_logging(cli.log_dir.clone())?;

    let mut config = GameConfig::load(cli.config.as_deref());
    if let Some(rows) = cli.rows { config.world.rows = rows; }
    if let Some(cols) = cli.cols { config.world.cols = cols; }
    if cli.seed.is_some() { config.seed = cli.seed; }
    config.world.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, world = ?config.world, "starting");

    let mut session = Session::new(config.world.clone(), ChaCha8Rng::seed_from_u64(seed))
        .context("could not build the first map")?;

    let sound = SoundEngine::new();
    let mut renderer = Renderer::new();
    renderer.init()?;

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    result?;
    println!("Thanks for playing Archipelago! (seed {seed})");
    Ok(())
}

fn game_loop(
    session: &mut Session<ChaCha8Rng>,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let tick_rate = Duration::from_millis(config.timing.enemy_tick_ms);
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events()?;
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
            break;
        }

        if kb.any_pressed(KEYS_NEW_GAME) || gp.new_game_pressed() {
            session.submit(Command::NewGame);
            last_tick = Instant::now();
        } else if session.is_active() {
            for dir in kb.directions().chain(gp.directions().iter().copied()) {
                session.submit(Command::Move(dir));
            }
            // Ticking stops for good once the game is over.
            if last_tick.elapsed() >= tick_rate {
                session.submit(Command::Tick);
                last_tick = Instant::now();
            }
        }

        let events = session.pump();
        sound::play_events(sound, &events);

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// File-only logging: the terminal belongs to the renderer.
fn setup_logging(dir: Option<PathBuf>) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = dir.unwrap_or_else(default_log_directory);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "archipelago.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/archipelago.log", log_dir.display());
    Ok(guard)
}

/// Platform cache directory for logs.
fn default_log_directory() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Caches/archipelago/logs");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg_cache) = std::env::var_os("XDG_CACHE_HOME") {
            return PathBuf::from(xdg_cache).join("archipelago/logs");
        } else if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".cache/archipelago/logs");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(local_appdata) = std::env::var_os("LOCALAPPDATA") {
            return PathBuf::from(local_appdata).join("archipelago").join("logs");
        }
    }

    std::env::temp_dir().join("archipelago/logs")
}

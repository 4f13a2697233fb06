/// External configuration loader.
///
/// Reads `config.toml` from an explicit path, or else from the executable's
/// directory or the CWD. Falls back to defaults if the file is missing or
/// incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::GameError;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub timing: TimingConfig,
    pub gamepad: GamepadConfig,
    /// Fixed RNG seed; None = seed from entropy.
    pub seed: Option<u64>,
}

/// Map and population parameters for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    pub rows: usize,
    pub cols: usize,
    pub island_count: usize,
    pub max_island_size: usize,
    pub treasure_count: usize,
    pub enemy_count: usize,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub enemy_tick_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub new_game: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_cols")]
    cols: usize,
    #[serde(default = "default_island_count")]
    island_count: usize,
    #[serde(default = "default_max_island_size")]
    max_island_size: usize,
    #[serde(default = "default_treasure_count")]
    treasure_count: usize,
    #[serde(default = "default_enemy_count")]
    enemy_count: usize,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_enemy_tick")]
    enemy_tick_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_new_game")]
    new_game: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: u64, // 0 = random
}

// ── Defaults ──

fn default_rows() -> usize { 10 }
fn default_cols() -> usize { 10 }
fn default_island_count() -> usize { 3 }
fn default_max_island_size() -> usize { 10 }
fn default_treasure_count() -> usize { 5 }
fn default_enemy_count() -> usize { 3 }
fn default_enemy_tick() -> u64 { 1000 }

fn default_new_game() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld {
            rows: default_rows(),
            cols: default_cols(),
            island_count: default_island_count(),
            max_island_size: default_max_island_size(),
            treasure_count: default_treasure_count(),
            enemy_count: default_enemy_count(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { enemy_tick_ms: default_enemy_tick() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            new_game: default_new_game(),
            quit: default_quit(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        TomlConfig::default().into_world()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Validation ──

/// Upper bound on `rows * cols`; anything larger is a config error.
pub const MAX_GRID_CELLS: usize = 1 << 20;

impl WorldConfig {
    /// Reject parameters the generator or placement could never satisfy.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::Config(format!(
                "grid must be at least 1x1 (got {}x{})",
                self.rows, self.cols
            )));
        }
        if self.island_count == 0 {
            return Err(GameError::Config("island_count must be at least 1".into()));
        }
        if self.treasure_count == 0 {
            return Err(GameError::Config("treasure_count must be at least 1".into()));
        }
        let cells = self
            .rows
            .checked_mul(self.cols)
            .filter(|&n| n <= MAX_GRID_CELLS)
            .ok_or_else(|| {
                GameError::Config(format!(
                    "a {}x{} grid exceeds the limit of {} cells",
                    self.rows, self.cols, MAX_GRID_CELLS
                ))
            })?;
        let land_budget = self.island_count.checked_mul(self.max_island_size);
        if land_budget.map_or(true, |budget| budget > cells) {
            return Err(GameError::Config(format!(
                "{} islands of up to {} cells cannot fit in a {}x{} grid",
                self.island_count, self.max_island_size, self.rows, self.cols
            )));
        }
        // The first island grows on an empty grid, so it always reaches
        // max_island_size. That island alone must hold player, boat and
        // every treasure; later islands may be crowded out.
        if self.max_island_size < 2 {
            return Err(GameError::Config(
                "max_island_size must be at least 2 (player and boat share an island)".into(),
            ));
        }
        let needed = self.treasure_count.checked_add(2);
        if needed.map_or(true, |n| n > self.max_island_size) {
            return Err(GameError::Config(format!(
                "{} treasures plus player and boat need more than max_island_size ({}) cells",
                self.treasure_count, self.max_island_size
            )));
        }
        Ok(())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `explicit` if given, otherwise search for
    /// `config.toml` in (1) the exe directory, (2) the current directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let toml_cfg = match explicit {
            Some(path) => read_toml(path).unwrap_or_default(),
            None => candidate_dirs()
                .iter()
                .map(|d| d.join("config.toml"))
                .find(|p| p.exists())
                .and_then(|p| read_toml(&p))
                .unwrap_or_default(),
        };
        GameConfig::from_toml(toml_cfg)
    }

    /// Parse config text directly. Unknown keys are ignored.
    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(GameConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let seed = (cfg.general.seed != 0).then_some(cfg.general.seed);
        GameConfig {
            timing: TimingConfig { enemy_tick_ms: cfg.timing.enemy_tick_ms },
            gamepad: GamepadConfig {
                new_game: cfg.gamepad.new_game.clone(),
                quit: cfg.gamepad.quit.clone(),
            },
            seed,
            world: cfg.into_world(),
        }
    }
}

impl TomlConfig {
    fn into_world(self) -> WorldConfig {
        WorldConfig {
            rows: self.world.rows,
            cols: self.world.cols,
            island_count: self.world.island_count,
            max_island_size: self.world.max_island_size,
            treasure_count: self.world.treasure_count,
            enemy_count: self.world.enemy_count,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Read and parse one config file. Errors are logged and yield None.
fn read_toml(path: &Path) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("{} parse error: {e}; using default settings", path.display());
                None
            }
        },
        Err(e) => {
            tracing::warn!("could not read {}: {e}", path.display());
            None
        }
    }
}

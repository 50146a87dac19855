use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use ratatui::style::Color;
use serde::Deserialize;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default grid dimensions (40×40 cells, the classic 400×400 board at
/// 10-unit cells).
pub const DEFAULT_GRID_WIDTH: u16 = 40;
pub const DEFAULT_GRID_HEIGHT: u16 = 40;

/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Default render width of one grid cell in terminal columns. Terminal cells
/// are roughly twice as tall as wide, so two columns per cell keeps the board
/// square-ish.
pub const DEFAULT_CELL_WIDTH: u16 = 2;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Rule applied when the head would leave grid bounds.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Coordinates wrap around to the opposite edge.
    Wrap,
    /// Leaving the board ends the game.
    Lethal,
}

/// Named tick-interval presets.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Returns the preset tick interval in milliseconds.
    #[must_use]
    pub fn tick_interval_ms(self) -> u64 {
        match self {
            Self::Easy => 150,
            Self::Medium => 100,
            Self::Hard => 75,
        }
    }
}

/// Resolved runtime configuration for one game session.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub grid: GridSize,
    /// Render-only horizontal scale: terminal columns per grid cell.
    pub cell_width: u16,
    pub tick_interval_ms: u64,
    pub edge_policy: EdgePolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            cell_width: DEFAULT_CELL_WIDTH,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            edge_policy: EdgePolicy::Lethal,
        }
    }
}

/// Optional user configuration file; every field may be omitted.
///
/// `difficulty` is applied before `tick_interval_ms`, so an explicit interval
/// always wins over a preset.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub grid_width: Option<u16>,
    pub grid_height: Option<u16>,
    pub cell_width: Option<u16>,
    pub difficulty: Option<Difficulty>,
    pub tick_interval_ms: Option<u64>,
    pub edge_policy: Option<EdgePolicy>,
}

impl ConfigFile {
    /// Overlays the present fields onto `config`.
    pub fn apply(self, config: &mut GameConfig) {
        if let Some(width) = self.grid_width {
            config.grid.width = width;
        }
        if let Some(height) = self.grid_height {
            config.grid.height = height;
        }
        if let Some(cell_width) = self.cell_width {
            config.cell_width = cell_width;
        }
        if let Some(difficulty) = self.difficulty {
            config.tick_interval_ms = difficulty.tick_interval_ms();
        }
        if let Some(interval) = self.tick_interval_ms {
            config.tick_interval_ms = interval;
        }
        if let Some(policy) = self.edge_policy {
            config.edge_policy = policy;
        }
    }
}

/// Returns the platform-correct user config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads the user configuration file.
///
/// Returns defaults when the file does not exist (first run). Returns `Err`
/// when the file exists but cannot be read or parsed, so the caller can abort
/// with a readable message before entering raw terminal mode.
pub fn load_config_file(path: &Path) -> io::Result<ConfigFile> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfigFile::default()),
        Err(e) => return Err(e),
    };

    serde_json::from_str::<ConfigFile>(&raw).map_err(io::Error::other)
}

/// A color theme applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    /// Solid block color for the snake head.
    pub snake_head: Color,
    /// Solid block color for body segments.
    pub snake_body: Color,
    /// Solid block color for food.
    pub food: Color,
    /// Background color for empty play-area cells.
    pub play_bg: Color,
    pub border_fg: Color,
    pub popup_title: Color,
    pub popup_footer: Color,
}

/// Classic green snake on black, red food — the look of the original.
pub const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake_head: Color::White,
    snake_body: Color::Green,
    food: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::DarkGray,
    popup_title: Color::Green,
    popup_footer: Color::DarkGray,
};

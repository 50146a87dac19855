use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use grid_snake::config::{self, Difficulty, EdgePolicy, GameConfig};
use grid_snake::game::{GameState, GameStatus};
use grid_snake::input::{self, GameInput};
use grid_snake::renderer;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Parser)]
#[command(name = "grid-snake", version, about = "Classic grid Snake for the terminal")]
struct Cli {
    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Terminal columns per grid cell (render-only).
    #[arg(long = "cell-width")]
    cell_width: Option<u16>,

    /// Tick interval in milliseconds; overrides any difficulty preset.
    #[arg(long = "tick-interval")]
    tick_interval_ms: Option<u64>,

    /// What happens when the head reaches a board edge.
    #[arg(long = "edge-policy", value_enum)]
    edge_policy: Option<EdgePolicy>,

    /// Tick-interval preset (easy 150 ms, medium 100 ms, hard 75 ms).
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Path to a JSON config file; defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Resolve configuration before touching the terminal so parse errors
    // print normally.
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Failed to load configuration: {error}");
            return Err(error);
        }
    };

    install_panic_hook();

    setup_terminal().and_then(|mut terminal| {
        let result = run(&mut terminal, &config, cli.seed);
        cleanup_terminal()?;
        result
    })
}

/// Resolution order: built-in defaults, then config file, then CLI flags.
fn resolve_config(cli: &Cli) -> io::Result<GameConfig> {
    let mut config = GameConfig::default();

    let path = cli.config.clone().unwrap_or_else(config::config_path);
    config::load_config_file(&path)?.apply(&mut config);

    if let Some(width) = cli.width {
        config.grid.width = width;
    }
    if let Some(height) = cli.height {
        config.grid.height = height;
    }
    if let Some(cell_width) = cli.cell_width {
        config.cell_width = cell_width;
    }
    if let Some(difficulty) = cli.difficulty {
        config.tick_interval_ms = difficulty.tick_interval_ms();
    }
    if let Some(interval) = cli.tick_interval_ms {
        config.tick_interval_ms = interval;
    }
    if let Some(policy) = cli.edge_policy {
        config.edge_policy = policy;
    }

    if config.grid.width < 2 || config.grid.height < 2 {
        return Err(io::Error::other("grid must be at least 2x2 cells"));
    }

    Ok(config)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &GameConfig,
    seed: Option<u64>,
) -> io::Result<()> {
    let mut state = GameState::new(config, seed);
    let tick_interval = Duration::from_millis(config.tick_interval_ms);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            renderer::render(frame, &state.snapshot(), state.bounds(), config.cell_width);
        })?;

        if let Some(game_input) = input::poll_input(INPUT_POLL_INTERVAL)? {
            match game_input {
                GameInput::Quit => break,
                GameInput::Direction(direction) => state.set_direction(direction),
                GameInput::Confirm if state.status == GameStatus::GameOver => {
                    state = GameState::new(config, seed);
                    last_tick = Instant::now();
                }
                GameInput::Confirm => {}
            }
        }

        if last_tick.elapsed() >= tick_interval {
            state.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn cleanup_terminal() -> io::Result<()> {
    disable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)?;

    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_after_panic();
        default_hook(panic_info);
    }));
}

fn restore_terminal_after_panic() {
    let _ = disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
}

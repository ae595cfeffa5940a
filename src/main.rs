mod app;
mod config;
mod domain;
mod input;
mod notifications;
mod ticker;
mod ui;

use app::AppState;
use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{default_config_path, init_config, load_config, AppConfig};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{TaskStore, UiMode};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use ticker::{refresh_duration, Ticker};

#[derive(Parser)]
#[command(name = "todo-timer")]
#[command(about = "Terminal to-do list with projects, due dates, memos and a work/rest interval timer", long_about = None)]
struct Cli {
    /// Config file path. Defaults to <config dir>/todo-timer/config.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Work interval in minutes (1-60), overrides the config file
    #[arg(short, long)]
    work: Option<u32>,

    /// Rest interval in minutes (1-30), overrides the config file
    #[arg(short, long)]
    rest: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with default settings
    InitConfig,
    /// Print the effective settings
    ShowConfig,
}

fn main() -> Result<()> {
    // Logs go to stderr; silent unless RUST_LOG is set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    match cli.command {
        Some(Commands::InitConfig) => {
            init_config(&config_path)?;
            println!("Wrote default config: {}", config_path.display());
            Ok(())
        }
        Some(Commands::ShowConfig) => {
            let config = load_config(&config_path)?.with_overrides(cli.work, cli.rest);
            println!("# {}", config_path.display());
            println!("{}", config.to_json()?);
            Ok(())
        }
        None => {
            let config = load_config(&config_path)?.with_overrides(cli.work, cli.rest);
            run_tui(config)
        }
    }
}

fn run_tui(config: AppConfig) -> Result<()> {
    // Validate before touching the terminal
    let timer = config.build_timer()?;
    info!(
        "starting with {}m work / {}m rest, tick {}ms",
        config.work_minutes, config.rest_minutes, config.tick_ms
    );

    let mut app = AppState::new(TaskStore::new(), timer, config.notifications);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    config: &AppConfig,
) -> Result<()> {
    let refresh = refresh_duration(config.refresh_ms);
    let mut ticker = Ticker::new(config.tick_ms);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(refresh)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    // Memo editing spawns $EDITOR - need to leave raw mode
                    if app.ui_mode == UiMode::Normal
                        && matches!(key.code, KeyCode::Char('m') | KeyCode::Char('M'))
                    {
                        disable_raw_mode()?;
                        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

                        let handled = input::handle_key(app, key);

                        // Restore the TUI before looking at the result
                        enable_raw_mode()?;
                        execute!(io::stdout(), EnterAlternateScreen)?;
                        terminal.clear()?;

                        if handled? {
                            return Ok(());
                        }
                    } else {
                        let should_quit = input::handle_key(app, key)?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }

        // At most one timer tick per loop iteration
        if ticker.due(Instant::now()) {
            app.tick();
        }
    }
}

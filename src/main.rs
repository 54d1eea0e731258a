use std::fs::File;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::filter::EnvFilter;

use galaga_tui::app::App;
use galaga_tui::config::Config;
use galaga_tui::event::{Event, EventHandler};
use galaga_tui::ui;

fn init_logging(config: &Config) -> Result<()> {
    // The terminal belongs to the game, so logs only ever go to a file
    let Some(path) = &config.log_file else { return Ok(()) };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;
    init_logging(&config)?;

    // Release events are only reported with the enhancement flags on
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let mut app = App::new(&config, enhanced)?;
    info!(tick_ms = config.tick_ms, enhanced, "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(config.tick_ms);

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| ui::render(frame, &app))?;

            match event_handler.next()? {
                Event::Tick => app.on_tick(),
                Event::Key(key) => app.on_key(key),
            }

            if app.should_quit {
                return Ok(());
            }
        }
    })();

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

mod app;
mod helpers;
mod types;

use crate::{app::App, helpers::Cli};

use anyhow::Result;
use clap::Parser;
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
};
use scramble_text::ScrambleEngine;
use std::{
    io,
    time::{Duration, Instant},
};

const POLLING_RATE_MS: u64 = 16;

fn main() -> Result<()> {
    let cli = Cli::parse();
    helpers::init_tracing(cli.log_file.as_deref())?;

    let config = cli.scramble_config()?;
    let source = cli.text_source()?;
    let engine = match cli.seed {
        Some(seed) => ScrambleEngine::seeded(config, seed)?,
        None => ScrambleEngine::new(config)?,
    };
    let mut app = App::new(source, engine, !cli.idle);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);
    app.teardown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| app.draw_ui(frame))?;

        if event::poll(Duration::from_millis(POLLING_RATE_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => break,
                        _ => app.handle_key(key),
                    }
                }
            }
        }

        let now = Instant::now();
        app.tick(now.duration_since(last_tick));
        last_tick = now;
    }

    tracing::info!("exiting");
    Ok(())
}

mod app;
mod chart;
mod config;
mod i18n;
mod store;
mod types;
mod ui;
mod utils;

rust_i18n::i18n!("locales");

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::app::App;
use crate::i18n::Locale;
use crate::store::LocaleStore;
use crate::utils::log_msg;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Display language ("es" or "en"); overrides the persisted preference.
    #[arg(long)]
    locale: Option<Locale>,
    /// Preference file holding the persisted locale.
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut store = LocaleStore::new(cli.config);
    let active = store.initialize();
    log_msg("info", &format!("Tour started, locale {active}"));

    let mut app = App::new(store);
    if let Some(locale) = cli.locale {
        // An explicit choice is written through, so it sticks next session.
        app.store.set(locale);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.handle_events();

        terminal.draw(|f| ui::draw(f, &app))?;

        // Mounting needs the layout pass above to have attached the target;
        // a miss here is retried on the next tick.
        app.sync_chart();

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}

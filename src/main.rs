use clap::Parser;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::error::Error;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

use dexbrowse::app::{spawn, App, AppEvent, Effect};
use dexbrowse::config::{Cli, Config};
use dexbrowse::fetch::PokeApi;
use dexbrowse::logging;
use dexbrowse::ui::draw_ui;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    let _log_guard = logging::init(&cli.log_file)?;
    info!(
        api_base = %config.api_base,
        limit = config.catalog_limit,
        max_id = config.max_id,
        precheck = config.precheck,
        "starting"
    );

    let api = PokeApi::new(&config.api_base)?;
    let limit = config.catalog_limit;
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(config);
    let effects = app.start(cli.id.as_deref());

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, effects, &api, limit, &tx, rx);

    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    initial: Vec<Effect>,
    api: &PokeApi,
    limit: u32,
    tx: &UnboundedSender<AppEvent>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<(), Box<dyn Error>> {
    for effect in initial {
        spawn(effect, api, limit, tx);
    }

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        // Apply every finished load before painting.
        while let Ok(ev) = rx.try_recv() {
            for effect in app.handle_event(ev) {
                spawn(effect, api, limit, tx);
            }
        }

        draw_ui(terminal, app)?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    for effect in app.handle_key(key) {
                        spawn(effect, api, limit, tx);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
    Ok(())
}

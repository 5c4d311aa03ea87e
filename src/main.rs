use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::{info, warn};

use pomodoer::{
    alert::{Alert, DesktopAlert, SilentAlert},
    app::App,
    logging,
    prefs::{FieldSpec, JsonFileStore, Overrides, PreferenceStore},
    ui::render_ui,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
const FRAME_RATE: Duration = Duration::from_millis(250);

// ============================================================================
// CLI Arguments
// ============================================================================

/// Per-run overrides. Numeric values are clamped to the same ranges as the
/// settings form. They are never saved; editing the same field in the UI
/// replaces the override with a stored value.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "🍅 pomodoer - Pomodoro timer for the terminal")]
struct Args {
    /// focus length, e.g. 25, 25m, 1h30m
    #[arg(short, long, value_parser = parse_minutes)]
    focus: Option<f64>,
    /// short break length
    #[arg(short, long, value_parser = parse_minutes)]
    short_break: Option<f64>,
    /// long break length
    #[arg(short, long, value_parser = parse_minutes)]
    long_break: Option<f64>,
    /// focus sessions before a long break
    #[arg(short, long)]
    cycles: Option<u32>,
    /// daily goal in focus sessions
    #[arg(short, long)]
    goal: Option<u32>,
    /// start the next session automatically
    #[arg(long)]
    auto_start: bool,
    #[arg(long)]
    no_sound: bool,
    /// no desktop notifications or sounds at all
    #[arg(long)]
    no_notify: bool,
    /// preferences file to use instead of the default location
    #[arg(long)]
    prefs: Option<PathBuf>,
}

/// Minutes from `25`, `25m`, `1h30m` or `90s`.
fn parse_minutes(s: &str) -> std::result::Result<f64, String> {
    let s = s.trim().to_lowercase();
    if let Ok(m) = s.parse::<f64>() {
        return Ok(m);
    }

    let mut total = 0.0;
    let mut num = String::new();
    for c in s.chars() {
        match c {
            '0'..='9' | '.' => num.push(c),
            'h' => { total += num.parse::<f64>().map_err(|_| "Invalid hours")? * 60.0; num.clear(); }
            'm' => { total += num.parse::<f64>().map_err(|_| "Invalid minutes")?; num.clear(); }
            's' => { total += num.parse::<f64>().map_err(|_| "Invalid seconds")? / 60.0; num.clear(); }
            _ => return Err("Invalid format".into()),
        }
    }
    if !num.is_empty() {
        return Err("Missing unit".into());
    }
    Ok(total)
}

fn overrides(args: &Args) -> Overrides {
    Overrides {
        focus_duration: args.focus.map(|v| FieldSpec::FOCUS.clamp(v)),
        short_break_duration: args.short_break.map(|v| FieldSpec::SHORT_BREAK.clamp(v)),
        long_break_duration: args.long_break.map(|v| FieldSpec::LONG_BREAK.clamp(v)),
        cycles_to_long_break: args.cycles.map(|v| FieldSpec::CYCLES.clamp(v as f64)),
        daily_goal: args.goal.map(|v| FieldSpec::DAILY_GOAL.clamp(v as f64)),
        auto_start_next: args.auto_start.then_some(true),
        sound_enabled: args.no_sound.then_some(false),
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(&logging::default_log_dir());

    let store = match &args.prefs {
        Some(path) => JsonFileStore::with_path(path),
        None => JsonFileStore::new(),
    };
    info!(path = %store.path().display(), "loading preferences");
    let prefs = store.load();
    let overrides = overrides(&args);
    if !overrides.is_empty() {
        info!(?overrides, "command line overrides for this run");
    }

    let alert: Box<dyn Alert> = if args.no_notify {
        Box::new(SilentAlert)
    } else {
        Box::new(DesktopAlert)
    };
    let mut app = App::with_overrides(prefs, overrides, store, alert);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        warn!(error = %e, "exiting with error");
    }
    res
}

fn run<S: PreferenceStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        // The header clock needs a periodic repaint even while paused.
        if app.needs_redraw || last_frame.elapsed() >= FRAME_RATE {
            terminal.draw(|f| render_ui(f, app))?;
            app.needs_redraw = false;
            last_frame = Instant::now();
        }

        let timeout = app.poll_timeout(Instant::now(), FRAME_RATE);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        info!("quit");
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => app.needs_redraw = true,
                _ => {}
            }
        }

        app.update(Instant::now());
    }
}

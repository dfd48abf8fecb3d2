use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use lingr::app::{Action, App};
use lingr::config::Config;
use lingr::event::{AppEvent, EventHandler};
use lingr::logging;
use lingr::session::descriptor::NavParams;
use lingr::session::navigation::{NavDecision, NavTarget};
use lingr::ui::components::celebration::CelebrationOverlay;
use lingr::ui::components::result_view::ResultView;
use lingr::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    Route,
    Json,
}

#[derive(Parser)]
#[command(
    name = "lingr",
    version,
    about = "Lesson result screen for translation exercises",
    after_help = "The chosen route is printed on stdout when the screen is left."
)]
struct Cli {
    /// Navigation parameters, e.g. "state=incorrect&expected=Querida%20Ana"
    params: Option<String>,

    #[arg(long, help = "Outcome token (correct, incorrect)")]
    state: Option<String>,

    #[arg(long, help = "Expected answer, may be percent-encoded")]
    expected: Option<String>,

    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        help = "First time this item enters the review pool"
    )]
    first_review: Option<String>,

    #[arg(long, help = "Review preset, e.g. 2-day")]
    preset: Option<String>,

    #[arg(long, help = "Lesson progress in percent")]
    progress: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Disable feedback sounds")]
    mute: bool,

    #[arg(long, help = "Write logs here instead of the data directory")]
    log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Emit::Route, help = "Output format for the chosen route")]
    emit: Emit,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,
}

impl Cli {
    fn nav_params(&self) -> NavParams {
        let mut params = self
            .params
            .as_deref()
            .map(NavParams::from_query)
            .unwrap_or_default();
        let overrides = [
            ("state", &self.state),
            ("expected", &self.expected),
            ("firstReview", &self.first_review),
            ("preset", &self.preset),
            ("progress", &self.progress),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                params.set(key, value);
            }
        }
        params
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let log_path = cli.log_file.clone().unwrap_or_else(Config::default_log_path);
    if let Err(err) = logging::init(&log_path) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        log::warn!("could not load config, using defaults: {err:#}");
        Config::default()
    });
    if cli.mute {
        config.sound_enabled = false;
    }
    if let Some(ref name) = cli.theme {
        config.theme = name.clone();
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!("theme {:?} not found, using default", config.theme);
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let descriptor = cli.nav_params().into_descriptor(config.review_preset());

    // The screen goes to stderr so a caller capturing stdout only gets the route.
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(descriptor, config, theme, Instant::now());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    if let Some(target) = app.decision {
        println!("{}", decision_line(target, cli.emit)?);
    }

    Ok(())
}

/// The only text written to stdout.
fn decision_line(target: NavTarget, emit: Emit) -> Result<String> {
    Ok(match emit {
        Emit::Route => target.route(),
        Emit::Json => serde_json::to_string(&NavDecision::new(target))?,
    })
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, Instant::now()),
            AppEvent::Tick(now) => app.on_tick(now),
            AppEvent::Resize => app.advance(Instant::now()),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.abort();
        return;
    }

    let action = match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('c') => Action::Continue,
        KeyCode::Char('r') => Action::Review,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => Action::Close,
        KeyCode::Char('d') => Action::Dismiss,
        _ => return,
    };
    app.handle(action, now);
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let state = app.render_state();

    frame.render_widget(ResultView::new(&state, app.theme, app.pulse_on()), area);

    if let Some(ref confetti) = app.confetti {
        frame.render_widget(confetti.layer(Instant::now(), app.theme), area);
    }

    if state.celebration_visible {
        frame.render_widget(CelebrationOverlay::new(state.review_preset, app.theme), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingr::session::descriptor::ReviewPreset;

    #[test]
    fn decision_line_is_a_single_plain_line() {
        let line = decision_line(NavTarget::Review(ReviewPreset::default()), Emit::Route).unwrap();
        assert_eq!(line, "/review/schedule?preset=2-day");

        let json = decision_line(NavTarget::Tip, Emit::Json).unwrap();
        assert!(!json.contains('\n'));
        assert!(!json.contains('\x1b'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["route"], "/lesson/tip");
    }

    #[test]
    fn cli_overrides_query_values() {
        let cli = Cli::parse_from([
            "lingr",
            "state=correct&expected=Querida%20Ana",
            "--state",
            "incorrect",
            "--first-review",
        ]);
        let params = cli.nav_params();
        assert_eq!(params.state.as_deref(), Some("incorrect"));
        assert_eq!(params.expected.as_deref(), Some("Querida%20Ana"));
        assert_eq!(params.first_review.as_deref(), Some("true"));
    }
}

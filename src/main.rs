mod app;
mod logging;
mod ui;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use app::{Editor, ExitSignal, FsPersistence, PreferenceMenu, Screen, load_settings};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A small full-screen terminal text editor.
#[derive(Debug, Parser)]
#[command(name = "ygreg", version)]
struct Args {
    /// File to edit. A missing file is created on first save.
    path: PathBuf,
    /// Settings file; defaults to ./ygreg.toml, ./.ygreg.toml, then ~/.config/ygreg/config.toml.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Where ygreg.log is written.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, SetCursorStyle::SteadyBar)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), SetCursorStyle::DefaultUserShape, LeaveAlternateScreen);
    }
}

struct CrosstermScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl CrosstermScreen {
    fn new() -> Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    fn next_key(&mut self) -> Result<Option<KeyEvent>> {
        if !event::poll(POLL_INTERVAL)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

impl Screen for CrosstermScreen {
    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    fn draw(&mut self, editor: &Editor) -> Result<()> {
        self.terminal.draw(|f| ui::draw(f, editor))?;
        Ok(())
    }

    fn read_key(&mut self) -> Result<Option<KeyEvent>> {
        self.next_key()
    }
}

fn show_help(screen: &mut CrosstermScreen, editor: &Editor) -> Result<()> {
    loop {
        screen.terminal.draw(|f| ui::draw_help(f, &editor.theme))?;
        if let Some(key) = screen.next_key()? {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Enter) {
                return Ok(());
            }
        }
    }
}

fn edit_settings(screen: &mut CrosstermScreen, editor: &mut Editor) -> Result<()> {
    let mut menu = PreferenceMenu::default();
    loop {
        screen
            .terminal
            .draw(|f| ui::draw_settings(f, editor.settings(), &menu))?;
        let Some(key) = screen.next_key()? else {
            continue;
        };
        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Up => menu.up(),
            KeyCode::Down => menu.down(),
            KeyCode::Left => menu.current().cycle(editor.settings_mut(), false),
            KeyCode::Right | KeyCode::Enter => menu.current().cycle(editor.settings_mut(), true),
            _ => {}
        }
    }
    editor.apply_settings();
    info!(settings = ?editor.settings(), "settings changed");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    let _log_guard = logging::init(&log_dir)?;
    let settings = load_settings(args.config.as_deref()).context("load settings")?;
    info!(path = %args.path.display(), theme = %settings.theme, "starting");

    let mut editor = Editor::open(args.path.clone(), settings, Box::new(FsPersistence));
    let _guard = TerminalGuard::enter()?;
    let mut screen = CrosstermScreen::new()?;
    loop {
        match editor.run(&mut screen)? {
            ExitSignal::Quit => break,
            ExitSignal::Help => show_help(&mut screen, &editor)?,
            ExitSignal::Settings => edit_settings(&mut screen, &mut editor)?,
        }
    }
    Ok(())
}

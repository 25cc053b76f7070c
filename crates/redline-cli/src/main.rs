use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use env_logger::{Env, Target};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use redline_config::Config;
use redline_engine::{
    BlockType, CaretMove, Cmd, EditError, FileStore, InlineStyle, KeyValueStore, RenderBlock,
    Session, SessionError, Snapshot,
};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

type Tui = Terminal<CrosstermBackend<Stdout>>;

struct App {
    session: Session<FileStore>,
    status: String,
}

/// What a keypress asks the app to do
#[derive(Debug, PartialEq)]
enum Action {
    Edit(Cmd),
    Save,
    Clear,
    Quit,
    Ignore,
}

impl App {
    fn new(session: Session<FileStore>) -> Self {
        Self {
            session,
            status: "Ctrl-S: Save | Ctrl-L: Clear | Esc/Ctrl-Q: Quit".to_string(),
        }
    }

    fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Edit(cmd) => match self.session.apply(&cmd) {
                Ok(patch) => {
                    if let Some(trigger) = patch.fired {
                        self.status = format!("{trigger:?} applied");
                    }
                }
                Err(err) => {
                    log::warn!("{cmd:?} rejected: {err}");
                    self.status = format!("Edit rejected: {err}");
                }
            },
            Action::Save => {
                self.status = match self.session.save() {
                    Ok(()) => format!("Saved under {:?}", self.session.key()),
                    Err(err) => {
                        log::error!("save failed: {err}");
                        format!("Save failed: {err}")
                    }
                };
            }
            Action::Clear => {
                self.status = match self.session.clear() {
                    Ok(()) => "Cleared".to_string(),
                    Err(err) => {
                        log::error!("clear failed: {err}");
                        format!("Clear failed: {err}")
                    }
                };
            }
            Action::Quit => return false,
            Action::Ignore => {}
        }
        true
    }
}

fn key_action(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('q') if ctrl => Action::Quit,
        KeyCode::Char('s') if ctrl => Action::Save,
        KeyCode::Char('l') if ctrl => Action::Clear,
        KeyCode::Char(_) if ctrl => Action::Ignore,
        KeyCode::Char(c) => Action::Edit(Cmd::InsertText {
            text: c.to_string(),
        }),
        KeyCode::Enter => Action::Edit(Cmd::SplitBlock),
        KeyCode::Backspace => Action::Edit(Cmd::DeleteBackward),
        KeyCode::Delete => Action::Edit(Cmd::DeleteForward),
        KeyCode::Left => move_caret(CaretMove::Left),
        KeyCode::Right => move_caret(CaretMove::Right),
        KeyCode::Up => move_caret(CaretMove::Up),
        KeyCode::Down => move_caret(CaretMove::Down),
        KeyCode::Home => move_caret(CaretMove::LineStart),
        KeyCode::End => move_caret(CaretMove::LineEnd),
        _ => Action::Ignore,
    }
}

fn move_caret(to: CaretMove) -> Action {
    Action::Edit(Cmd::MoveCaret { to })
}

fn init_logging(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    // The terminal belongs to the editor, so logs go to a file
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let mut clear = false;
    let mut store_arg = None;
    for arg in &args[1..] {
        match arg.as_str() {
            "--clear" => clear = true,
            other if !other.starts_with('-') && store_arg.is_none() => {
                store_arg = Some(PathBuf::from(other))
            }
            _ => {
                eprintln!("Usage: {} [--clear] [store-dir]", args[0]);
                process::exit(1);
            }
        }
    }

    let mut config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", config_path.display());
            process::exit(1);
        }
    };
    if let Some(store_path) = store_arg {
        config.store_path = store_path;
    }

    init_logging(&config.log_file_path())?;
    log::info!("redline starting up, store at {}", config.store_path.display());

    let store = match FileStore::open(&config.store_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!(
                "Error: Store path '{}' is invalid: {e}",
                config.store_path.display()
            );
            process::exit(1);
        }
    };

    let mut session = match Session::open(store, config.storage_key.clone()) {
        Ok(session) => session,
        Err(SessionError::Edit(e @ EditError::MalformedDocument { .. })) if !clear => {
            eprintln!("Error: Stored document is unreadable: {e}");
            eprintln!("Run with --clear to discard it and start fresh");
            process::exit(1);
        }
        Err(SessionError::Edit(EditError::MalformedDocument { .. })) => {
            let mut store = FileStore::new(&config.store_path);
            store.delete(&config.storage_key)?;
            log::warn!("discarded unreadable document {:?}", config.storage_key);
            Session::open(store, config.storage_key.clone())?
        }
        Err(e) => return Err(e.into()),
    };
    if clear {
        session.clear()?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("editor loop failed: {err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle(key_action(key))
        {
            return Ok(());
        }
    }
}

fn block_style(kind: BlockType) -> Style {
    if kind.is_heading() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_block(block: &RenderBlock) -> Line<'_> {
    let base = block_style(block.kind);
    let spans: Vec<Span> = block
        .segments
        .iter()
        .map(|segment| {
            let mut style = base;
            for inline in &segment.styles {
                style = match inline {
                    InlineStyle::Bold => style.add_modifier(Modifier::BOLD),
                    InlineStyle::Underline => style.add_modifier(Modifier::UNDERLINED),
                    // Colored through the decorator flag below
                    InlineStyle::Redline => style,
                };
            }
            if segment.redline {
                style = style.fg(Color::Red);
            }
            Span::styled(segment.text.as_str(), style)
        })
        .collect();
    Line::from(spans)
}

/// Line and column of the caret, if it is collapsed
fn caret_location(snapshot: &Snapshot) -> Option<(usize, usize)> {
    snapshot
        .blocks
        .iter()
        .enumerate()
        .find_map(|(line, block)| block.caret.map(|column| (line, column)))
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let snapshot = app.session.snapshot();
    let lines: Vec<Line> = snapshot.blocks.iter().map(render_block).collect();

    // Keep the caret line in view
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let caret = caret_location(&snapshot);
    let scroll = caret
        .map(|(line, _)| line.saturating_sub(visible.saturating_sub(1)))
        .unwrap_or(0);

    let editor = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("redline: {}", app.session.key())),
        )
        .scroll((scroll as u16, 0));
    f.render_widget(editor, chunks[0]);

    if let Some((line, column)) = caret {
        let x = chunks[0].x + 1 + column as u16;
        let y = chunks[0].y + 1 + (line - scroll) as u16;
        f.set_cursor_position((x, y));
    }

    let status = Paragraph::new(Line::from(vec![
        Span::raw(format!("v{} | ", app.session.version())),
        Span::raw(app.status.as_str()),
    ]));
    f.render_widget(status, chunks[1]);
}

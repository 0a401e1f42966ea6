use std::fs::OpenOptions;
use std::io;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};

use tui_file_explorer::{
    CollapsedRail, ExplorerAction, ExplorerEvent, ExplorerGlyphs, ExplorerState, ExplorerStyle,
    ExplorerView, Forest, KeymapProfile, ScrollPolicy, SidebarState, fixture,
};

const LOG_ENV: &str = "FILE_EXPLORER_LOG";

#[derive(Parser, Debug)]
#[command(name = "file-explorer", about = "Editable file tree explorer in a collapsible sidebar")]
struct Cli {
    /// Use ASCII glyphs instead of box-drawing characters.
    #[arg(long)]
    ascii: bool,

    /// Navigation key profile.
    #[arg(long, value_enum, default_value_t = Profile::Default)]
    keymap: Profile,

    /// Sidebar width in columns.
    #[arg(long, default_value_t = 34)]
    sidebar_width: u16,

    /// Start from an empty tree instead of the sample project.
    #[arg(long)]
    empty: bool,

    /// Do not draw guide lines.
    #[arg(long)]
    no_guides: bool,

    /// Keep the selected row centered while scrolling.
    #[arg(long)]
    center: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Profile {
    Default,
    Vim,
    Arrows,
}

impl From<Profile> for KeymapProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Default => Self::Default,
            Profile::Vim => Self::Vim,
            Profile::Arrows => Self::Arrows,
        }
    }
}

struct App {
    state: ExplorerState,
    sidebar: SidebarState,
    style: ExplorerStyle<'static>,
    glyphs: ExplorerGlyphs<'static>,
}

fn main() -> io::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let forest = if cli.empty {
        Forest::new()
    } else {
        fixture::seed_forest()
    };
    let mut state = ExplorerState::new(forest);
    state.keymap_mut().set_profile(cli.keymap.into());
    state.set_draw_lines(!cli.no_guides);

    let mut app = App {
        state,
        sidebar: SidebarState::new(cli.sidebar_width),
        style: explorer_style(cli.center),
        glyphs: if cli.ascii {
            ExplorerGlyphs::ascii()
        } else {
            ExplorerGlyphs::unicode()
        },
    };

    let terminal = ratatui::init();
    let result =
        execute!(io::stdout(), EnableMouseCapture).and_then(|()| run_app(terminal, &mut app));
    let released = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result.and(released)
}

// Logging is opt-in and goes to a file so it cannot corrupt the alternate screen.
fn init_logging() -> io::Result<()> {
    let Ok(path) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(log::LevelFilter::Debug)
        .init();
    log::info!("file explorer starting");
    Ok(())
}

fn explorer_style(center: bool) -> ExplorerStyle<'static> {
    let mut style = ExplorerStyle::default();
    style.block_style = Style::default().fg(Color::Rgb(220, 223, 228));
    style.border_style = Style::default().fg(Color::Rgb(92, 110, 140));
    style.line_style = Style::default().fg(Color::Rgb(86, 98, 120));
    style.folder_style = Style::default().add_modifier(Modifier::BOLD);
    style.highlight_style = Style::default()
        .fg(Color::Rgb(0, 176, 255))
        .bg(Color::Rgb(30, 30, 30))
        .add_modifier(Modifier::BOLD);
    style.edit_style = Style::default().bg(Color::Rgb(34, 34, 34));
    style.notice_style = Style::default().fg(Color::Rgb(255, 196, 0));
    if center {
        style.scroll_policy = ScrollPolicy::CenterOnSelect;
    }
    style
}

fn run_app(mut terminal: DefaultTerminal, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) => key,
            // A collapsed sidebar has no rows to hit.
            Event::Mouse(mouse) if !app.sidebar.is_collapsed() => {
                app.state.handle_mouse(mouse);
                continue;
            }
            _ => continue,
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            break;
        }
        let idle = app.state.edit_session().is_none() && app.state.notice().is_none();
        if idle && key.code == KeyCode::Char('q') {
            break;
        }

        if let ExplorerEvent::Action(ExplorerAction::ToggleSidebar) = app.state.handle_key(key) {
            app.sidebar.toggle();
            log::debug!("sidebar collapsed={}", app.sidebar.is_collapsed());
        }
    }
    Ok(())
}

fn render(frame: &mut Frame, app: &mut App) {
    let [body, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
    let (sidebar_area, content_area) = app.sidebar.split(body);

    if app.sidebar.is_collapsed() {
        frame.render_widget(CollapsedRail::new(app.style.border_style), sidebar_area);
    } else {
        let view = ExplorerView::new(app.style.clone()).glyphs(app.glyphs);
        frame.render_stateful_widget(view, sidebar_area, &mut app.state);
    }

    render_details(frame, &app.state, content_area);
    frame.render_widget(
        Paragraph::new(hints(&app.state)).style(Style::default().add_modifier(Modifier::DIM)),
        footer,
    );
}

fn render_details(frame: &mut Frame, state: &ExplorerState, area: Rect) {
    let path = state
        .selected_id()
        .and_then(|id| state.forest().path_to(id))
        .unwrap_or_default();
    let lines = match path.last() {
        Some(node) => {
            let names: Vec<&str> = path.iter().map(|node| node.name()).collect();
            let mut lines = vec![
                Line::from(names.join("/")),
                Line::from(""),
                Line::from(format!("Kind: {}", node.kind())),
            ];
            if node.is_folder() {
                lines.push(Line::from(format!("Items: {}", node.children().len())));
                lines.push(Line::from(if node.is_open() {
                    "Expanded"
                } else {
                    "Collapsed"
                }));
            }
            lines
        }
        None => vec![Line::from("Nothing selected")],
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Details")),
        area,
    );
}

fn hints(state: &ExplorerState) -> &'static str {
    if state.notice().is_some() {
        " any key: dismiss"
    } else if state.edit_session().is_some() {
        " enter: save  esc: done  (blank name on esc removes the item)"
    } else {
        " ↑↓/click move  enter: open/close  a/A: new file/folder  n/N: at top  r: rename  del: delete  ^B: sidebar  q: quit"
    }
}

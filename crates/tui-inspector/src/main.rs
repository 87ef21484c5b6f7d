//! Terminal parse-tree inspector
//!
//! Shows the parse tree of a Java file as a tree-table next to the source. Selecting a node
//! highlights the source text it covers; the locator panel shows a query that finds the node
//! again.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tui-inspector -- Foo.java --mode comments
//! INSPECTOR_LOG=debug cargo run -p tui-inspector -- Foo.java --log-file inspector.log
//! ```
//!
//! # Keys
//!
//! - Up/Down/Home/End/PageUp/PageDown: move the selection
//! - Right/Left: expand / collapse (or jump to the parent)
//! - Enter, double click: expand/collapse the selected node and show its locator
//! - `/`: find a node by locator
//! - `o`: open a file
//! - `m`: cycle the parse mode (applies on the next reload)
//! - F5: reload
//! - `q`: quit

use clap::{Parser, ValueEnum};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use inspector_core::{
    InspectorSession, KeyStroke, MouseEvent, ParseMode, SearchOutcome, Span as SourceSpan,
    TreeTableConfig, TreeTableView,
};
use inspector_treesitter::JavaParser;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use std::{
    fs::File,
    io::{self, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LOG_ENV: &str = "INSPECTOR_LOG";
const DOUBLE_CLICK: Duration = Duration::from_millis(400);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Drop comments.
    Plain,
    /// Keep comments as nodes.
    Comments,
    /// Keep comments and expand javadoc.
    Javadoc,
}

impl From<ModeArg> for ParseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Plain => ParseMode::Plain,
            ModeArg::Comments => ParseMode::WithComments,
            ModeArg::Javadoc => ParseMode::WithCommentsAndDocs,
        }
    }
}

/// Inspect the parse tree of a Java source file.
#[derive(Debug, Parser)]
#[command(name = "tui-inspector", version, about)]
struct Cli {
    /// Java file to open.
    path: Option<PathBuf>,

    /// How the parser treats comments.
    #[arg(long, value_enum, default_value_t = ModeArg::Javadoc)]
    mode: ModeArg,

    /// Log file; the terminal is used by the UI.
    #[arg(long, default_value = "tui-inspector.log")]
    log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Open,
    Search,
}

struct App {
    session: InspectorSession<JavaParser>,
    should_quit: bool,
    status_message: String,
    /// Modal notice, shown until dismissed.
    notice: Option<String>,
    input_mode: InputMode,
    input_buffer: String,
    /// First grid row on screen.
    scroll_top: usize,
    /// Grid rows that fit on screen.
    visible_rows: usize,
    /// Screen area of the grid body, for mouse hits.
    body_area: Rect,
    viewport_width: u16,
    last_click: Option<(Instant, u16, u16)>,
}

impl App {
    fn new(mode: ParseMode) -> Result<Self, inspector_treesitter::JavaParseError> {
        let mut session = InspectorSession::new(JavaParser::new()?, TreeTableConfig::default());
        session.set_parse_mode(mode);
        session.subscribe(|change| {
            tracing::info!(
                change = ?change.change_type,
                version = change.new_version,
                "session changed"
            );
        });
        Ok(Self {
            session,
            should_quit: false,
            status_message: String::new(),
            notice: None,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            scroll_top: 0,
            visible_rows: 1,
            body_area: Rect::default(),
            viewport_width: 0,
            last_click: None,
        })
    }

    fn open(&mut self, path: &Path) {
        self.scroll_top = 0;
        match self.session.open_file(path) {
            Ok(()) => self.status_message = format!("Opened {}", path.display()),
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    fn reload(&mut self) {
        if self.session.document().is_none() {
            self.status_message = "Nothing to reload".to_string();
            return;
        }
        self.scroll_top = 0;
        match self.session.reload() {
            Ok(()) => self.status_message = "Reloaded".to_string(),
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    fn cycle_mode(&mut self) {
        let mode = self.session.parse_mode().next();
        self.session.set_parse_mode(mode);
        self.status_message = format!("Parse mode: {} (F5 to reload)", mode.label());
    }

    fn search(&mut self, query: &str) {
        match self.session.search_by_locator(query) {
            SearchOutcome::Found => self.status_message = "Found".to_string(),
            SearchOutcome::NotFound => self.status_message = "No match".to_string(),
            SearchOutcome::Empty => self.status_message = "No file opened".to_string(),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.notice = None;
            }
            return;
        }

        if self.input_mode != InputMode::Normal {
            self.handle_prompt_key(key);
            return;
        }

        self.status_message.clear();
        let view = self.session.view_mut();
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
                self.should_quit = true;
            }
            (_, KeyCode::Enter) => {
                view.handle_key(KeyStroke::Enter);
            }
            (_, KeyCode::Up) => {
                view.handle_key(KeyStroke::Up);
            }
            (_, KeyCode::Down) => {
                view.handle_key(KeyStroke::Down);
            }
            (_, KeyCode::Left) => {
                view.handle_key(KeyStroke::Left);
            }
            (_, KeyCode::Right) => {
                view.handle_key(KeyStroke::Right);
            }
            (_, KeyCode::Home) => {
                view.handle_key(KeyStroke::Home);
            }
            (_, KeyCode::End) => {
                view.handle_key(KeyStroke::End);
            }
            (_, KeyCode::PageUp) => {
                let row = view.selected_row().unwrap_or(0);
                view.select_row(row.saturating_sub(self.visible_rows));
            }
            (_, KeyCode::PageDown) => {
                let last = view.outline().row_count().saturating_sub(1);
                let row = view.selected_row().unwrap_or(0);
                view.select_row((row + self.visible_rows).min(last));
            }
            (_, KeyCode::F(5)) => self.reload(),
            (_, KeyCode::Char('m')) => self.cycle_mode(),
            (_, KeyCode::Char('o')) => {
                self.input_mode = InputMode::Open;
                self.input_buffer = self
                    .session
                    .document()
                    .and_then(|doc| doc.path())
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
            }
            (_, KeyCode::Char('/')) => {
                self.input_mode = InputMode::Search;
                self.input_buffer.clear();
            }
            _ => {}
        }
        self.adjust_scroll();
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input_buffer);
                let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
                match mode {
                    InputMode::Open => self.open(Path::new(input.trim())),
                    InputMode::Search => self.search(input.trim()),
                    InputMode::Normal => {}
                }
                self.adjust_scroll();
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, event: event::MouseEvent) {
        if self.notice.is_some() || event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        self.status_message.clear();
        let area = self.body_area;
        if event.column < area.x
            || event.column >= area.x + area.width
            || event.row < area.y
            || event.row >= area.y + area.height
        {
            return;
        }
        let x = event.column - area.x;
        let row = usize::from(event.row - area.y) + self.scroll_top;
        let Ok(y) = u16::try_from(row) else {
            return;
        };

        let now = Instant::now();
        let double = self.last_click.is_some_and(|(at, cx, cy)| {
            now.duration_since(at) <= DOUBLE_CLICK && cx == event.column && cy == event.row
        });
        self.last_click = if double {
            None
        } else {
            Some((now, event.column, event.row))
        };

        let click = if double {
            MouseEvent::double_click(x, y)
        } else {
            MouseEvent::click(x, y)
        };
        self.session.view_mut().click(click);
        self.adjust_scroll();
    }

    fn adjust_scroll(&mut self) {
        let Some(row) = self.session.view().selected_row() else {
            return;
        };
        if row < self.scroll_top {
            self.scroll_top = row;
        } else if row >= self.scroll_top + self.visible_rows {
            self.scroll_top = row + 1 - self.visible_rows;
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[0]);

        self.render_table(frame, panes[0]);
        self.render_source(frame, panes[1]);
        self.render_locator(frame, chunks[1]);
        self.render_status_line(frame, chunks[2]);
        self.render_shortcuts(frame, chunks[3]);

        if let Some(notice) = &self.notice {
            render_notice(frame, notice);
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.session.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width != self.viewport_width {
            self.viewport_width = inner.width;
            self.session.view_mut().set_viewport_width(inner.width);
        }
        self.body_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        self.visible_rows = usize::from(self.body_area.height).max(1);

        let view = self.session.view();
        let widths = view.layout().widths();
        let header = Row::new(
            (0..view.column_count())
                .map(|c| Cell::from(view.column_name(c).unwrap_or_default()))
                .collect::<Vec<_>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let end = (self.scroll_top + self.visible_rows).min(view.row_count());
        let selected = view.selection().rows();
        let indent = usize::from(view.outline().indent());
        let rows: Vec<Row> = (self.scroll_top..end)
            .map(|row| {
                let mut cells = Vec::with_capacity(widths.len());
                cells.push(Cell::from(fit(&tree_cell(view, row, indent), widths[0])));
                for (column, &width) in widths.iter().enumerate().skip(1) {
                    let text = view
                        .value_at(row, column)
                        .map(|value| value.to_string())
                        .unwrap_or_default();
                    cells.push(Cell::from(fit(&text.replace('\n', "\\n"), width)));
                }
                let style = if selected.is_selected(row) {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };
                Row::new(cells).style(style)
            })
            .collect();

        let table = Table::new(rows, widths.map(Constraint::Length))
            .header(header)
            .column_spacing(0);
        frame.render_widget(table, inner);
    }

    fn render_source(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Source");
        let inner_height = usize::from(block.inner(area).height);
        let Some(document) = self.session.document() else {
            frame.render_widget(Paragraph::new("No file opened").block(block), area);
            return;
        };

        let span = self.session.current_selection_span();
        let view = self.session.view();
        let first_line = span
            .and_then(|span| view.line_offsets().line_of_offset(span.start))
            .map_or(0, |line| line.saturating_sub(1));
        let scroll = first_line.saturating_sub(inner_height / 3);

        let mut offset = 0;
        let mut lines = Vec::with_capacity(document.lines().len());
        for text in document.lines() {
            let len = text.chars().count();
            lines.push(highlight_line(text, offset, span));
            offset += len + 1;
        }
        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
        frame.render_widget(paragraph, area);
    }

    fn render_locator(&self, frame: &mut Frame, area: Rect) {
        let panel = Paragraph::new(self.session.view().locator_panel())
            .block(Block::default().borders(Borders::ALL).title("Locator"))
            .wrap(Wrap { trim: false });
        frame.render_widget(panel, area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let view = self.session.view();
        let status_text = match self.input_mode {
            InputMode::Open => format!("Open > {}  (Enter=Open, Esc=Cancel)", self.input_buffer),
            InputMode::Search => {
                format!("Locator > {}  (Enter=Find, Esc=Cancel)", self.input_buffer)
            }
            InputMode::Normal if !self.status_message.is_empty() => self.status_message.clone(),
            InputMode::Normal => {
                let span = self
                    .session
                    .current_selection_span()
                    .map(|span| format!("{}..{}", span.start, span.end))
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "Rows:{} | Row:{} | Span:{} | Mode:{} | Version:{}",
                    view.row_count(),
                    view.selected_row().map_or_else(|| "-".to_string(), |r| r.to_string()),
                    span,
                    self.session.parse_mode().label(),
                    self.session.version()
                )
            }
        };

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = if self.notice.is_some() {
            "Esc/Enter:Dismiss"
        } else {
            "Arrows:Move  Enter:Expand/Collapse  /:Locator  o:Open  m:Mode  F5:Reload  q:Quit"
        };
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

/// Indent, expand glyph and label of a grid row.
fn tree_cell(view: &TreeTableView, row: usize, indent: usize) -> String {
    let Some(entry) = view.outline_row(row) else {
        return String::new();
    };
    let glyph = match (entry.leaf, entry.expanded) {
        (true, _) => " ",
        (false, true) => "▾",
        (false, false) => "▸",
    };
    let label = view.label_at(row).unwrap_or_default();
    format!(
        "{:pad$}{glyph:<indent$}{label}",
        "",
        pad = entry.depth * indent,
    )
}

/// Truncate `text` to `width` display cells.
fn fit(text: &str, width: u16) -> String {
    let width = usize::from(width);
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

/// One source line starting at char offset `start`, with the part inside `span` highlighted.
fn highlight_line(text: &str, start: usize, span: Option<SourceSpan>) -> Line<'static> {
    let len = text.chars().count();
    let Some(span) = span.filter(|span| span.start < start + len && span.end > start) else {
        return Line::from(text.to_string());
    };
    let from = span.start.saturating_sub(start);
    let to = (span.end - start).min(len);
    let piece = |a: usize, b: usize| text.chars().skip(a).take(b - a).collect::<String>();
    Line::from(vec![
        Span::raw(piece(0, from)),
        Span::styled(
            piece(from, to),
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        Span::raw(piece(to, len)),
    ])
}

fn render_notice(frame: &mut Frame, notice: &str) {
    let area = frame.area();
    let width = area.width.saturating_mul(3) / 5;
    let height = 7.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    let paragraph = Paragraph::new(notice.to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .style(Style::default().fg(Color::LightRed)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let mut app = App::new(cli.mode.into()).map_err(io::Error::other)?;
    if let Some(path) = &cli.path {
        app.open(path);
    }

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "terminal loop failed");
        eprintln!("error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                _ => {}
            }
        } else {
            // Idle: let coalesced row refreshes land.
            app.session.view_mut().process_idle();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_truncates_by_display_width() {
        assert_eq!(fit("CLASS_DEF", 20), "CLASS_DEF");
        assert_eq!(fit("CLASS_DEF", 6), "CLASS…");
        assert_eq!(fit("日本語", 4), "日…");
    }

    #[test]
    fn test_highlight_line_splits_on_span() {
        let line = highlight_line("  int x;", 10, Some(SourceSpan::new(12, 15)));
        let pieces: Vec<_> = line.spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(pieces, vec!["  ", "int", " x;"]);

        let untouched = highlight_line("class A {", 0, Some(SourceSpan::new(12, 15)));
        assert_eq!(untouched.spans.len(), 1);
    }

    #[test]
    fn test_status_message_clears_on_next_key() {
        let mut app = App::new(ParseMode::WithCommentsAndDocs).unwrap();
        app.cycle_mode();
        assert!(app.status_message.starts_with("Parse mode:"));

        app.handle_key_event(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        assert!(app.status_message.is_empty());

        app.handle_key_event(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE));
        assert_eq!(app.status_message, "Nothing to reload");
    }

    #[test]
    fn test_mode_argument_maps_to_parse_mode() {
        assert_eq!(ParseMode::from(ModeArg::Plain), ParseMode::Plain);
        assert_eq!(ParseMode::from(ModeArg::Javadoc), ParseMode::WithCommentsAndDocs);
        let cli = Cli::parse_from(["tui-inspector", "A.java", "--mode", "comments"]);
        assert_eq!(cli.mode, ModeArg::Comments);
        assert_eq!(cli.path, Some(PathBuf::from("A.java")));
    }
}

//! # Terminal User Interface
//!
//! Renders the chessboard, status line, control buttons and move history
//! with Ratatui, and translates crossterm key/mouse events into `App`
//! method calls. The board is redrawn from the session snapshot on every
//! frame; selection and target highlights are recomputed each time, so no
//! stale markers survive a redraw.

use crate::app::{App, HistoryEntry, Selection};
use crate::board::{piece_glyph, Coord};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::io;
use std::time::Duration;

/// Terminal cells per board square.
const CELL_WIDTH: u16 = 4;
const CELL_HEIGHT: u16 = 2;
/// Board panel size including its border.
const BOARD_WIDTH: u16 = 8 * CELL_WIDTH + 2;
const BOARD_HEIGHT: u16 = 8 * CELL_HEIGHT + 2;

/// Maps board cells to screen rectangles and back.
///
/// Every cell gets a unique rect in fixed row-major order; `coord_at` is the
/// inverse used for mouse hit-testing.
#[derive(Debug, Clone, Copy)]
pub struct BoardLayout {
    origin_x: u16,
    origin_y: u16,
}

impl BoardLayout {
    /// Lays the 8x8 grid out inside `area` (a bordered panel).
    pub fn new(area: Rect) -> Self {
        Self {
            origin_x: area.x + 1,
            origin_y: area.y + 1,
        }
    }

    pub fn cell_rect(&self, at: Coord) -> Rect {
        Rect::new(
            self.origin_x + u16::from(at.col) * CELL_WIDTH,
            self.origin_y + u16::from(at.row) * CELL_HEIGHT,
            CELL_WIDTH,
            CELL_HEIGHT,
        )
    }

    /// The cell containing the screen position, if any.
    pub fn coord_at(&self, column: u16, row: u16) -> Option<Coord> {
        if column < self.origin_x || row < self.origin_y {
            return None;
        }
        let col = (column - self.origin_x) / CELL_WIDTH;
        let r = (row - self.origin_y) / CELL_HEIGHT;
        if col < 8 && r < 8 {
            Some(Coord::new(r as u8, col as u8))
        } else {
            None
        }
    }
}

/// Screen regions, computed identically for drawing and hit-testing.
struct ScreenLayout {
    board_area: Rect,
    board: BoardLayout,
    status: Rect,
    new_game: Rect,
    train: Rect,
    history: Rect,
    instructions: Rect,
}

impl ScreenLayout {
    fn new(size: Rect) -> Self {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(BOARD_WIDTH), Constraint::Min(24)])
            .split(outer[0]);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(main[1]);
        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(side[1]);

        let board_area = Rect {
            height: main[0].height.min(BOARD_HEIGHT),
            ..main[0]
        };
        Self {
            board_area,
            board: BoardLayout::new(board_area),
            status: side[0],
            new_game: buttons[0],
            train: buttons[1],
            history: side[2],
            instructions: outer[1],
        }
    }
}

pub fn run_tui(app: &mut App) -> io::Result<()> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // restore terminal even when the loop errored
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        app.tick();
        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        app.should_quit = true;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') => app.new_game(),
                    KeyCode::Char('t') | KeyCode::Char('T') => app.request_training(),
                    KeyCode::Up => app.move_cursor(-1, 0),
                    KeyCode::Down => app.move_cursor(1, 0),
                    KeyCode::Left => app.move_cursor(0, -1),
                    KeyCode::Right => app.move_cursor(0, 1),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        let at = app.cursor;
                        app.handle_square_click(at);
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        handle_mouse_click(app, mouse.column, mouse.row, terminal.size()?);
                    }
                }
                _ => {}
            }
        }
    }
}

fn handle_mouse_click(app: &mut App, column: u16, row: u16, size: Rect) {
    let layout = ScreenLayout::new(size);
    if let Some(at) = layout.board.coord_at(column, row) {
        app.cursor = at;
        app.handle_square_click(at);
    } else if contains(layout.new_game, column, row) {
        app.new_game();
    } else if contains(layout.train, column, row) {
        app.request_training();
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}

fn ui(f: &mut Frame, app: &App) {
    let layout = ScreenLayout::new(f.size());

    draw_board(f, app, &layout);
    draw_status(f, app, layout.status);
    draw_buttons(f, &layout);
    draw_history(f, app, layout.history);

    let instructions = Paragraph::new(
        "Click a piece to select it, then click a destination. Arrow keys + Enter work too. 'n' new game, 't' train AI, 'q' or Esc to quit.",
    )
    .wrap(ratatui::widgets::Wrap { trim: true })
    .block(Block::default().title("Instructions").borders(Borders::ALL));
    f.render_widget(instructions, layout.instructions);
}

fn draw_board(f: &mut Frame, app: &App, layout: &ScreenLayout) {
    let block = Block::default().title("Chess").borders(Borders::ALL);
    f.render_widget(block, layout.board_area);

    let snapshot = app.session.board_snapshot();
    let (selected, targets): (Option<Coord>, &[Coord]) = match &app.selection {
        Selection::Idle => (None, &[]),
        Selection::Selected { from, targets } => (Some(*from), targets),
    };

    for row in 0..8u8 {
        for col in 0..8u8 {
            let at = Coord::new(row, col);
            let symbol = match snapshot[row as usize][col as usize] {
                Some(piece) => piece_glyph(piece).to_string(),
                None => " ".to_string(),
            };

            let light = (row + col) % 2 == 0;
            let mut style = Style::default()
                .fg(Color::White)
                .bg(if light { Color::DarkGray } else { Color::Black });
            if targets.contains(&at) {
                style = style.bg(Color::Cyan).fg(Color::Black);
            }
            if selected == Some(at) {
                style = style.bg(Color::Yellow).fg(Color::Black);
            }
            if at == app.cursor {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }

            let cell = Paragraph::new(symbol)
                .style(style)
                .alignment(Alignment::Center);
            f.render_widget(cell, layout.board.cell_rect(at).intersection(f.size()));
        }
    }
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(app.status.as_str())
        .block(Block::default().title("Status").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_buttons(f: &mut Frame, layout: &ScreenLayout) {
    let new_game = Paragraph::new("New Game")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(new_game, layout.new_game);

    let train = Paragraph::new("Train AI")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(train, layout.train);
}

/// The slice of history a panel of `panel_height` rows can show, ending at
/// the newest entry (the list stays scrolled to its end).
fn history_window(history: &[HistoryEntry], panel_height: u16) -> &[HistoryEntry] {
    let visible = panel_height.saturating_sub(2) as usize; // borders
    &history[history.len().saturating_sub(visible)..]
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = history_window(&app.history, area.height)
        .iter()
        .map(|entry| ListItem::new(entry.label()))
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Move History").borders(Borders::ALL));
    f.render_widget(list, area);
}

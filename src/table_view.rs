//! Render/key/mouse logic for the artwork table pane

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tui::{
    backend::Backend,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;

use easel::artwork::COLUMN_HEADERS;
use easel::Session;

use crate::palette::STYLE;

/// Checkbox + the six data columns.
const COLUMN_WIDTHS: [Constraint; 7] = [
    Constraint::Length(4),
    Constraint::Percentage(24),
    Constraint::Percentage(13),
    Constraint::Percentage(22),
    Constraint::Percentage(19),
    Constraint::Length(10),
    Constraint::Length(9),
];

/// What the app has to do after a key/mouse event on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    None,
    ChangePage(u64),
    Reload,
    OpenPopover,
    Export,
    CopyIds,
    Quit,
}

pub struct TableView {
    /// Active page, 1-based.
    pub page: u64,
    /// Offset of the first row of the active page.
    pub first: u64,
    pub cursor: usize,
    /// First data row drawn, as left by the last render.
    pub scroll: usize,
    /// Pages with a navigation fetch in flight.
    pub in_flight: HashSet<u64>,
    pub last_area: Option<Rect>,
}

impl TableView {
    pub fn new() -> Self {
        Self {
            page: 1,
            first: 0,
            cursor: 0,
            scroll: 0,
            in_flight: HashSet::new(),
            last_area: None,
        }
    }

    pub fn is_loading(&self, session: &Session) -> bool {
        !session.cache.contains(self.page) && self.in_flight.contains(&self.page)
    }

    /// Switch pages; cursor and offset start over.
    pub fn set_page(&mut self, session: &Session, page: u64) {
        self.page = page.max(1);
        self.first = session.offset_for(self.page);
        self.cursor = 0;
        self.scroll = 0;
    }

    fn target_page(&self, session: &Session, delta: i64) -> Option<u64> {
        let last = session.page_count();
        let wanted = (self.page as i64 + delta).max(1) as u64;
        let wanted = if last > 0 { wanted.min(last) } else { wanted.min(1) };
        (wanted != self.page).then_some(wanted)
    }
}

/// Flattens embedded newlines and cuts to `width` graphemes with an ellipsis.
pub fn fit_cell(text: &str, width: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    let graphemes: Vec<&str> = flat.graphemes(true).collect();
    if graphemes.len() <= width {
        return flat;
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = graphemes[..width - 1].concat();
    out.push('…');
    out
}

pub fn handle_key(view: &mut TableView, session: &mut Session, key: KeyEvent) -> TableAction {
    let rows = session.visible_rows(view.page).len();

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            return TableAction::Quit;
        }
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
            view.cursor = view.cursor.saturating_sub(1);
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
            if view.cursor + 1 < rows {
                view.cursor += 1;
            }
        }
        (KeyCode::Char(' '), _) => {
            if let Some(art) = session.visible_rows(view.page).get(view.cursor) {
                let id = art.id;
                let on = session.selection.is_selected(id);
                session.selection.toggle(id, !on);
            }
        }
        (KeyCode::Char('a'), _) => session.toggle_page(view.page),
        (KeyCode::Left | KeyCode::PageUp, _) => {
            if let Some(p) = view.target_page(session, -1) {
                return TableAction::ChangePage(p);
            }
        }
        (KeyCode::Right | KeyCode::PageDown, _) => {
            if let Some(p) = view.target_page(session, 1) {
                return TableAction::ChangePage(p);
            }
        }
        (KeyCode::Home, _) => {
            if view.page != 1 {
                return TableAction::ChangePage(1);
            }
        }
        (KeyCode::End, _) => {
            let last = session.page_count();
            if last > 0 && view.page != last {
                return TableAction::ChangePage(last);
            }
        }
        (KeyCode::Char('r'), _) => return TableAction::Reload,
        (KeyCode::Char('n'), _) => return TableAction::OpenPopover,
        (KeyCode::Char('e'), _) => return TableAction::Export,
        (KeyCode::Char('y'), _) => return TableAction::CopyIds,
        _ => {}
    }
    TableAction::None
}

pub fn handle_mouse(view: &mut TableView, session: &mut Session, event: MouseEvent) {
    let Some(area) = view.last_area else { return };
    let inside = event.column >= area.x
        && event.column < area.x + area.width
        && event.row >= area.y
        && event.row < area.y + area.height;
    if !inside {
        return;
    }
    let rows = session.visible_rows(view.page).len();

    match event.kind {
        MouseEventKind::ScrollUp => view.cursor = view.cursor.saturating_sub(1),
        MouseEventKind::ScrollDown => {
            if view.cursor + 1 < rows {
                view.cursor += 1;
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            // border, then header row, then data rows
            let header_y = area.y + 1;
            if event.row == header_y {
                session.toggle_page(view.page);
            } else if event.row > header_y {
                let idx = view.scroll + (event.row - header_y - 1) as usize;
                if let Some(art) = session.visible_rows(view.page).get(idx) {
                    let id = art.id;
                    let on = session.selection.is_selected(id);
                    session.selection.toggle(id, !on);
                    view.cursor = idx;
                }
            }
        }
        _ => {}
    }
}

pub fn render<B: Backend>(view: &mut TableView, session: &Session, f: &mut Frame<B>, area: Rect) {
    view.last_area = Some(area);

    let title = match session.page_count() {
        0 => "Artworks".to_string(),
        n => format!("Artworks (page {} / {})", view.page, n),
    };
    let block = Block::default()
        .title(Span::styled(title, STYLE::border_focus()))
        .borders(Borders::ALL)
        .border_style(STYLE::border());

    if view.is_loading(session) {
        let p = Paragraph::new("Loading…").block(block).style(STYLE::info_fg());
        f.render_widget(p, area);
        return;
    }

    let rows_data = session.visible_rows(view.page);
    if rows_data.is_empty() {
        let p = Paragraph::new("No rows on this page").block(block).style(STYLE::info_fg());
        f.render_widget(p, area);
        return;
    }

    /* ---- header with tri-state checkbox ---- */
    let header_cells = std::iter::once(Cell::from(session.header_state(view.page).glyph()))
        .chain(COLUMN_HEADERS.iter().map(|h| Cell::from(*h)));
    let header = Row::new(header_cells).style(STYLE::header_row());

    /* ---- data rows, cells cut to their column width ---- */
    let inner_width = area.width.saturating_sub(2);
    let widths = column_char_widths(inner_width);
    let rows = rows_data.iter().map(|art| {
        let on = session.selection.is_selected(art.id);
        let check = if on {
            Cell::from("[x]").style(STYLE::checked())
        } else {
            Cell::from("[ ]")
        };
        let cells = art
            .columns()
            .into_iter()
            .zip(widths.iter().skip(1))
            .map(|(text, w)| Cell::from(fit_cell(&text, *w)));
        Row::new(std::iter::once(check).chain(cells)).style(STYLE::text())
    });

    let table = Table::new(rows)
        .header(header)
        .block(block)
        .widths(&COLUMN_WIDTHS)
        .column_spacing(1)
        .highlight_style(STYLE::cursor_row());

    let selected = view.cursor.min(rows_data.len() - 1);
    // border top/bottom plus the header row
    view.scroll = scroll_for(selected, area.height.saturating_sub(3) as usize);

    let mut state = TableState::default();
    state.select(Some(selected));
    f.render_stateful_widget(table, area, &mut state);
}

/// First visible row when a fresh `TableState` brings `selected` into a
/// window of `capacity` one-line rows.
fn scroll_for(selected: usize, capacity: usize) -> usize {
    (selected + 1).saturating_sub(capacity.max(1))
}

/// Character budget per column for a given inner width; mirrors `COLUMN_WIDTHS`.
fn column_char_widths(inner: u16) -> [usize; 7] {
    let mut out = [0usize; 7];
    for (slot, c) in out.iter_mut().zip(COLUMN_WIDTHS.iter()) {
        *slot = match c {
            Constraint::Length(n) => *n as usize,
            Constraint::Percentage(p) => (inner as usize * *p as usize) / 100,
            _ => 0,
        };
    }
    out
}

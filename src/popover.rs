//! "Select Rows" popover: a one-line text field that feeds the cross-page selector.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui::{
    backend::Backend,
    layout::Rect,
    style::Modifier,
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::palette::STYLE;

const WIDTH: u16 = 40;
const HEIGHT: u16 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopoverAction {
    None,
    Submit(String),
    Dismiss,
}

#[derive(Debug, Default)]
pub struct SelectPopover {
    pub input: String,
    /// (target, page being fetched) while a selection walk is running.
    pub busy: Option<(usize, u64)>,
}

impl SelectPopover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PopoverAction {
        match key.code {
            KeyCode::Esc => PopoverAction::Dismiss,
            KeyCode::Enter => PopoverAction::Submit(self.input.clone()),
            KeyCode::Backspace => {
                self.input.pop();
                PopoverAction::None
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(ch);
                PopoverAction::None
            }
            _ => PopoverAction::None,
        }
    }

    pub fn render<B: Backend>(&self, f: &mut Frame<B>, screen: Rect) {
        let area = centered(screen, WIDTH, HEIGHT);

        let mut lines = vec![
            Spans::from(Span::styled("Enter number of rows", STYLE::text())),
            Spans::from(vec![
                Span::styled(format!(" {}", self.input), STYLE::text()),
                Span::styled(" ", STYLE::cursor_row().add_modifier(Modifier::SLOW_BLINK)),
            ]),
            Spans::from(""),
        ];
        match self.busy {
            Some((target, page)) => lines.push(Spans::from(Span::styled(
                format!("Selecting {target} rows… fetching page {page}"),
                STYLE::info_fg(),
            ))),
            None => lines.push(Spans::from(Span::styled(
                "Enter: submit   Esc: close",
                STYLE::status_fg(),
            ))),
        }

        let p = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Span::styled("Select Rows", STYLE::header_row()))
                    .borders(Borders::ALL)
                    .border_style(STYLE::border_focus()),
            )
            .style(STYLE::popover_bg());

        f.render_widget(Clear, area);
        f.render_widget(p, area);
    }
}

fn centered(screen: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(screen.width);
    let h = h.min(screen.height);
    Rect {
        x: screen.x + (screen.width - w) / 2,
        y: screen.y + (screen.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_then_enter_submits_raw_text() {
        let mut pop = SelectPopover::new();
        for ch in "2x".chars() {
            pop.handle_key(press(KeyCode::Char(ch)));
        }
        pop.handle_key(press(KeyCode::Backspace));
        pop.handle_key(press(KeyCode::Char('5')));
        assert_eq!(pop.handle_key(press(KeyCode::Enter)), PopoverAction::Submit("25".into()));
        assert_eq!(pop.handle_key(press(KeyCode::Esc)), PopoverAction::Dismiss);
    }

    #[test]
    fn centered_fits_small_screens() {
        let r = centered(Rect { x: 0, y: 0, width: 30, height: 5 }, WIDTH, HEIGHT);
        assert_eq!((r.width, r.height, r.x, r.y), (30, 5, 0, 0));
    }
}

use tui::{
    backend::Backend,
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use easel::SelectionSet;

use crate::palette::STYLE;

/// Side pane: every selected id, across all pages.
pub fn render<B: Backend>(selection: &SelectionSet, f: &mut Frame<B>, area: Rect) {
    let ids = selection.selected_ids();
    let block = Block::default()
        .title(Span::styled(format!("Selected Rows ({})", ids.len()), STYLE::border_focus()))
        .borders(Borders::ALL)
        .border_style(STYLE::border());

    if ids.is_empty() {
        f.render_widget(
            Paragraph::new("No rows selected.").block(block).style(STYLE::info_fg()),
            area,
        );
        return;
    }

    let visible = area.height.saturating_sub(2) as usize;
    let mut items: Vec<ListItem> = ids
        .iter()
        .take(visible)
        .map(|id| ListItem::new(format!("Row ID: {id}")).style(STYLE::text()))
        .collect();
    if ids.len() > visible && visible > 0 {
        items.pop();
        items.push(ListItem::new(format!("… {} more", ids.len() - visible + 1)).style(STYLE::status_fg()));
    }
    f.render_widget(List::new(items).block(block), area);
}

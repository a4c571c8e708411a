use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Cursor position after `text` inside a bordered input box, kept within the border.
pub fn search_cursor(area: Rect, text: &str) -> (u16, u16) {
    let typed = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let inner_width = area.width.saturating_sub(2);
    let x = area.x + 1 + typed.min(inner_width.saturating_sub(1));
    (x, area.y + 1)
}

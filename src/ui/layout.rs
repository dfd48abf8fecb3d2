use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Header (close + lesson progress), body, and footer with the exits.
pub struct ResultLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
    pub compact: bool,
}

impl ResultLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(footer_lines + 2),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
            // Art is dropped below this height
            compact: area.height < 28,
        }
    }
}

/// Footer rows for the exit hints: all on one row when they fit side by
/// side, otherwise one hint per row.
pub fn hint_rows(hints: &[String], width: u16) -> Vec<String> {
    let row = format!("  {}", hints.join("   "));
    if row.chars().count() <= width as usize {
        vec![row]
    } else {
        hints.iter().map(|hint| format!("  {hint}")).collect()
    }
}

/// A `width` x `height` box in the middle of `area`, shrunk to fit.
pub fn popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

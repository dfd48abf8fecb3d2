use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// Borderless lesson progress track with a rounded look.
pub struct ProgressBar<'a> {
    pub ratio: f64,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(percent: u8, theme: &'a Theme) -> Self {
        Self {
            ratio: (percent as f64 / 100.0).clamp(0.0, 1.0),
            theme,
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if area.width < 2 || area.height == 0 {
            return;
        }

        let y = area.y + area.height / 2;
        let filled_width = (self.ratio * area.width as f64).round() as u16;

        for x in area.x..area.x + area.width {
            let color = if x < area.x + filled_width {
                colors.bar_filled()
            } else {
                colors.bar_empty()
            };
            buf[(x, y)].set_symbol("━").set_style(Style::default().fg(color));
        }
        buf[(area.x, y)].set_symbol("╺");
        buf[(area.x + area.width - 1, y)].set_symbol("╸");
    }
}

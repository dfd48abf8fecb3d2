use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::session::descriptor::ReviewPreset;
use crate::ui::layout::popup_rect;
use crate::ui::theme::Theme;

const POPUP_WIDTH: u16 = 48;
const POPUP_HEIGHT: u16 = 10;

/// Modal shown over the result screen on a first review.
pub struct CelebrationOverlay<'a> {
    pub preset: ReviewPreset,
    pub theme: &'a Theme,
}

impl<'a> CelebrationOverlay<'a> {
    pub fn new(preset: ReviewPreset, theme: &'a Theme) -> Self {
        Self { preset, theme }
    }
}

impl Widget for CelebrationOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = popup_rect(POPUP_WIDTH, POPUP_HEIGHT, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" First review! ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(colors.badge_bg()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "*  *  *",
                Style::default().fg(colors.badge_bg()),
            )),
            Line::from(Span::styled(
                "Your first word is in the review pool!",
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("We'll bring it back in {}.", self.preset.label()),
                Style::default().fg(colors.text_muted()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Got it",
                Style::default().fg(colors.accent()),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

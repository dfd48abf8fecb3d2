use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::session::presenter::{RenderState, ScreenVariant};
use crate::ui::art;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::{ResultLayout, hint_rows};
use crate::ui::theme::Theme;

pub const BADGE_TEXT: &str = " ★ Added to your reviews ";

pub struct ResultView<'a> {
    pub state: &'a RenderState,
    pub theme: &'a Theme,
    /// Blink phase for the pulsing badge; ignored once pulsing stops.
    pub pulse_on: bool,
}

impl<'a> ResultView<'a> {
    pub fn new(state: &'a RenderState, theme: &'a Theme, pulse_on: bool) -> Self {
        Self {
            state,
            theme,
            pulse_on,
        }
    }

    pub fn hints(&self) -> Vec<String> {
        let mut hints = vec!["[Enter] Continue".to_string()];
        if self.state.review_shortcut {
            hints.push(format!("[r] Review in {}", self.state.review_preset.label()));
        }
        hints.push("[Esc] Close".to_string());
        hints
    }

    fn outcome_color(&self) -> Color {
        match self.state.variant {
            ScreenVariant::Correct => self.theme.colors.success(),
            ScreenVariant::Incorrect => self.theme.colors.error(),
        }
    }

    fn body_lines(&self, compact: bool) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let accent = self.outcome_color();
        let mut lines: Vec<Line> = Vec::new();

        if !compact {
            for row in art::state_icon(self.state.variant) {
                lines.push(Line::from(Span::styled(row, Style::default().fg(accent))));
            }
            lines.push(Line::from(""));
        }

        let title = match self.state.variant {
            ScreenVariant::Correct => "¡Correcto!",
            ScreenVariant::Incorrect => "Incorrect",
        };
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )));

        if self.state.show_review_badge {
            let mut style = Style::default()
                .fg(colors.badge_fg())
                .bg(colors.badge_bg())
                .add_modifier(Modifier::BOLD);
            if self.state.badge_pulsing && self.pulse_on {
                style = style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(BADGE_TEXT, style)));
        }

        // Only the failure variant ever carries an answer.
        if let Some(answer) = &self.state.expected_answer {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Correct answer:",
                Style::default().fg(colors.text_muted()),
            )));
            lines.push(Line::from(Span::styled(
                answer.clone(),
                Style::default()
                    .fg(colors.fg())
                    .bg(colors.panel_bg())
                    .add_modifier(Modifier::BOLD),
            )));
        }

        lines.push(Line::from(""));
        let speech = match self.state.variant {
            ScreenVariant::Correct => "Great job!",
            ScreenVariant::Incorrect => "Keep practicing!",
        };
        if compact {
            lines.push(Line::from(Span::styled(
                format!("\u{201c}{speech}\u{201d}"),
                Style::default().fg(colors.fg()),
            )));
        } else {
            for row in character_with_bubble(&art::character(self.state.character), speech) {
                lines.push(Line::from(Span::styled(row, Style::default().fg(colors.fg()))));
            }
        }

        lines
    }
}

/// Place a speech bubble to the right of the character art.
fn character_with_bubble(character: &[String], speech: &str) -> Vec<String> {
    let art_width = character
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let inner = speech.chars().count() + 2;
    let bubble = [
        format!("╭{}╮", "─".repeat(inner)),
        format!("┤ {speech} │"),
        format!("╰{}╯", "─".repeat(inner)),
    ];

    let rows = character.len().max(bubble.len());
    (0..rows)
        .map(|i| {
            let art = character.get(i).map(String::as_str).unwrap_or("");
            let pad = art_width - art.chars().count();
            let side = bubble.get(i).map(String::as_str).unwrap_or("");
            format!("{art}{}  {side}", " ".repeat(pad))
                .trim_end()
                .to_string()
        })
        .collect()
}

impl Widget for ResultView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Block::default()
            .style(Style::default().bg(colors.bg()))
            .render(area, buf);

        let hint_lines = hint_rows(&self.hints(), area.width);
        let layout = ResultLayout::new(area, hint_lines.len() as u16);

        let header = layout.header;
        if header.width > 6 && header.height > 1 {
            let y = header.y + 1;
            buf.set_string(
                header.x + 1,
                y,
                "✕",
                Style::default().fg(colors.text_muted()),
            );
            ProgressBar::new(self.state.lesson_progress, self.theme)
                .render(Rect::new(header.x + 4, y, header.width - 5, 1), buf);
        }

        Paragraph::new(self.body_lines(layout.compact))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(layout.main, buf);

        let footer_block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(colors.border()));
        let footer_inner = footer_block.inner(layout.footer);
        footer_block.render(layout.footer, buf);
        let footer_lines: Vec<Line> = hint_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.accent()))))
            .collect();
        Paragraph::new(footer_lines).render(footer_inner, buf);
    }
}

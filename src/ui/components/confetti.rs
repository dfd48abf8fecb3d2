use std::time::{Duration, Instant};

use rand::Rng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

pub const CONFETTI_DURATION: Duration = Duration::from_millis(2500);

const GLYPHS: [&str; 5] = ["*", "+", "•", "◆", "~"];

#[derive(Clone, Copy, Debug)]
struct Piece {
    x: f64,
    start_y: f64,
    fall: f64,
    glyph: usize,
    color: usize,
}

/// Purely decorative falling pieces, alive for `CONFETTI_DURATION`.
pub struct Confetti {
    pieces: Vec<Piece>,
    started_at: Instant,
}

impl Confetti {
    pub fn burst<R: Rng + ?Sized>(count: usize, rng: &mut R, now: Instant) -> Self {
        let pieces = (0..count)
            .map(|_| Piece {
                x: rng.gen_range(0.0..1.0),
                start_y: rng.gen_range(-0.4..0.1),
                fall: rng.gen_range(0.6..1.3),
                glyph: rng.gen_range(0..GLYPHS.len()),
                color: rng.gen_range(0..4),
            })
            .collect();
        Self {
            pieces,
            started_at: now,
        }
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) < CONFETTI_DURATION
    }

    pub fn layer<'a>(&'a self, now: Instant, theme: &'a Theme) -> ConfettiLayer<'a> {
        let progress = now.saturating_duration_since(self.started_at).as_secs_f64()
            / CONFETTI_DURATION.as_secs_f64();
        ConfettiLayer {
            confetti: self,
            progress: progress.min(1.0),
            theme,
        }
    }
}

pub struct ConfettiLayer<'a> {
    confetti: &'a Confetti,
    progress: f64,
    theme: &'a Theme,
}

impl Widget for ConfettiLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.progress >= 1.0 || area.width == 0 || area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;
        let palette: [Color; 4] = [
            colors.success(),
            colors.accent(),
            colors.badge_bg(),
            colors.error(),
        ];

        for piece in &self.confetti.pieces {
            let y = piece.start_y + piece.fall * self.progress;
            if !(0.0..1.0).contains(&y) {
                continue;
            }
            let col = (piece.x * area.width as f64) as u16;
            let row = (y * area.height as f64) as u16;
            buf[(area.x + col.min(area.width - 1), area.y + row.min(area.height - 1))]
                .set_symbol(GLYPHS[piece.glyph])
                .set_style(Style::default().fg(palette[piece.color]));
        }
    }
}

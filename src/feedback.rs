use std::io::{self, Write};

use thiserror::Error;

use crate::session::descriptor::Outcome;

const BEL: &[u8] = b"\x07";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackCue {
    Correct,
    Incorrect,
}

impl FeedbackCue {
    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Correct => FeedbackCue::Correct,
            Outcome::Incorrect => FeedbackCue::Incorrect,
        }
    }

    pub fn asset_id(self) -> &'static str {
        match self {
            FeedbackCue::Correct => "correct-answer",
            FeedbackCue::Incorrect => "bad-answer",
        }
    }
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write to audio output")]
    Io(#[from] io::Error),
}

pub trait FeedbackPlayer {
    fn play(&mut self, cue: FeedbackCue) -> Result<(), PlaybackError>;
}

/// Rings the terminal bell: once for a correct answer, twice otherwise.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stderr> {
    /// The terminal is drawn on stderr; stdout is reserved for the route.
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FeedbackPlayer for TerminalBell<W> {
    fn play(&mut self, cue: FeedbackCue) -> Result<(), PlaybackError> {
        let rings = match cue {
            FeedbackCue::Correct => 1,
            FeedbackCue::Incorrect => 2,
        };
        for _ in 0..rings {
            self.out.write_all(BEL)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

pub struct Muted;

impl FeedbackPlayer for Muted {
    fn play(&mut self, cue: FeedbackCue) -> Result<(), PlaybackError> {
        log::debug!("sound disabled, skipping {}", cue.asset_id());
        Ok(())
    }
}

/// Fire the cue for `outcome` once. Playback failures are logged and dropped.
pub fn request_feedback(player: &mut dyn FeedbackPlayer, outcome: Outcome) -> FeedbackCue {
    let cue = FeedbackCue::for_outcome(outcome);
    if let Err(err) = player.play(cue) {
        log::warn!("could not play {} sound: {err}", cue.asset_id());
    }
    cue
}

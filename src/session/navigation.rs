use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::session::descriptor::ReviewPreset;

/// Where the router should take the user once the result screen is left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTarget {
    NextExercise,
    Tip,
    Review(ReviewPreset),
    Exit,
}

impl NavTarget {
    pub fn kind(self) -> &'static str {
        match self {
            NavTarget::NextExercise => "next-exercise",
            NavTarget::Tip => "tip",
            NavTarget::Review(_) => "review",
            NavTarget::Exit => "exit",
        }
    }

    pub fn route(self) -> String {
        match self {
            NavTarget::NextExercise => "/lesson/translate".to_string(),
            NavTarget::Tip => "/lesson/tip".to_string(),
            NavTarget::Review(preset) => format!("/review/schedule?preset={preset}"),
            NavTarget::Exit => "/".to_string(),
        }
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route())
    }
}

/// Handoff record printed for the router with `--emit json`.
#[derive(Clone, Debug, Serialize)]
pub struct NavDecision {
    pub target: &'static str,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<ReviewPreset>,
    pub decided_at: DateTime<Utc>,
}

impl NavDecision {
    pub fn new(target: NavTarget) -> Self {
        let preset = match target {
            NavTarget::Review(preset) => Some(preset),
            _ => None,
        };
        Self {
            target: target.kind(),
            route: target.route(),
            preset,
            decided_at: Utc::now(),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PRESET_DAYS: u32 = 2;
const MAX_PRESET_DAYS: u32 = 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("unknown outcome token {0:?}")]
    UnknownOutcome(String),
    #[error("invalid review preset {0:?}")]
    InvalidPreset(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
        }
    }

    /// Resolve an inbound token. Anything other than a recognised token,
    /// including a missing one, is Incorrect.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::parse::<Outcome>) {
            Some(Ok(outcome)) => outcome,
            Some(Err(err)) => {
                log::warn!("{err}, treating result as incorrect");
                Outcome::Incorrect
            }
            None => {
                log::warn!("result descriptor has no outcome, treating result as incorrect");
                Outcome::Incorrect
            }
        }
    }
}

impl FromStr for Outcome {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "correct" => Ok(Outcome::Correct),
            "incorrect" => Ok(Outcome::Incorrect),
            _ => Err(DescriptorError::UnknownOutcome(s.to_string())),
        }
    }
}

/// Review interval in whole days, written as `N-day`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReviewPreset {
    days: u32,
}

impl ReviewPreset {
    pub fn days(self) -> u32 {
        self.days
    }

    pub fn token(self) -> String {
        self.to_string()
    }

    pub fn label(self) -> String {
        if self.days == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", self.days)
        }
    }

    /// Parse `token`, falling back to `fallback` when it is malformed.
    pub fn from_token_or(token: Option<&str>, fallback: ReviewPreset) -> Self {
        match token.map(str::parse::<ReviewPreset>) {
            Some(Ok(preset)) => preset,
            Some(Err(err)) => {
                log::warn!("{err}, using {}", fallback.token());
                fallback
            }
            None => fallback,
        }
    }
}

impl Default for ReviewPreset {
    fn default() -> Self {
        Self {
            days: DEFAULT_PRESET_DAYS,
        }
    }
}

impl FromStr for ReviewPreset {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let digits = lowered
            .strip_suffix("-days")
            .or_else(|| lowered.strip_suffix("-day"))
            .or_else(|| lowered.strip_suffix('d'))
            .ok_or_else(|| DescriptorError::InvalidPreset(s.to_string()))?;
        match digits.parse::<u32>() {
            Ok(days) if (1..=MAX_PRESET_DAYS).contains(&days) => Ok(Self { days }),
            _ => Err(DescriptorError::InvalidPreset(s.to_string())),
        }
    }
}

impl fmt::Display for ReviewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-day", self.days)
    }
}

impl Serialize for ReviewPreset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}

impl<'de> Deserialize<'de> for ReviewPreset {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

/// Result of one evaluated answer, as handed over by the lesson runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultDescriptor {
    pub outcome: Outcome,
    /// Possibly percent-encoded; decoded at activation.
    pub expected_answer: Option<String>,
    pub is_first_review: bool,
    pub review_preset: ReviewPreset,
    /// Lesson completion shown in the header, 0..=100.
    pub lesson_progress: u8,
}

impl Default for ResultDescriptor {
    fn default() -> Self {
        Self {
            outcome: Outcome::Incorrect,
            expected_answer: None,
            is_first_review: false,
            review_preset: ReviewPreset::default(),
            lesson_progress: 0,
        }
    }
}

/// Raw navigation parameters before any defaulting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavParams {
    pub state: Option<String>,
    pub expected: Option<String>,
    pub first_review: Option<String>,
    pub preset: Option<String>,
    pub progress: Option<String>,
}

impl NavParams {
    /// Split a `key=value&key=value` query. `+` in a value is a space, as in
    /// form encoding; percent escapes are kept so the expected answer is
    /// decoded exactly once, at display time.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.trim().trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.set(key, &value.replace('+', " "));
        }
        params
    }

    pub fn set(&mut self, key: &str, value: &str) {
        let slot = match key {
            "state" | "outcome" => &mut self.state,
            "expected" | "expectedAnswer" => &mut self.expected,
            "firstReview" | "isFirstReview" => &mut self.first_review,
            "preset" | "reviewPreset" => &mut self.preset,
            "progress" => &mut self.progress,
            _ => {
                log::debug!("ignoring unknown navigation parameter {key:?}");
                return;
            }
        };
        *slot = Some(value.to_string());
    }

    /// Apply fail-safe defaults. Never fails.
    pub fn into_descriptor(self, default_preset: ReviewPreset) -> ResultDescriptor {
        ResultDescriptor {
            outcome: Outcome::from_token(self.state.as_deref()),
            expected_answer: self.expected.filter(|s| !s.is_empty()),
            is_first_review: self.first_review.as_deref().is_some_and(parse_flag),
            review_preset: ReviewPreset::from_token_or(self.preset.as_deref(), default_preset),
            lesson_progress: self.progress.as_deref().map_or(0, parse_progress),
        }
    }
}

fn parse_progress(token: &str) -> u8 {
    match token.trim().trim_end_matches('%').parse::<u32>() {
        Ok(percent) => percent.min(100) as u8,
        Err(_) => {
            log::warn!("invalid lesson progress {token:?}, showing 0%");
            0
        }
    }
}

fn parse_flag(token: &str) -> bool {
    matches!(
        token.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_tokens_are_case_insensitive() {
        assert_eq!(Outcome::from_token(Some("correct")), Outcome::Correct);
        assert_eq!(Outcome::from_token(Some(" CORRECT ")), Outcome::Correct);
        assert_eq!(Outcome::from_token(Some("incorrect")), Outcome::Incorrect);
    }

    #[test]
    fn unknown_or_missing_outcome_is_incorrect() {
        assert_eq!(Outcome::from_token(Some("maybe")), Outcome::Incorrect);
        assert_eq!(Outcome::from_token(Some("")), Outcome::Incorrect);
        assert_eq!(Outcome::from_token(None), Outcome::Incorrect);
    }

    #[test]
    fn preset_accepts_day_suffixes() {
        assert_eq!("2-day".parse::<ReviewPreset>().unwrap().days(), 2);
        assert_eq!("7-days".parse::<ReviewPreset>().unwrap().days(), 7);
        assert_eq!("14d".parse::<ReviewPreset>().unwrap().days(), 14);
    }

    #[test]
    fn preset_rejects_out_of_range_and_garbage() {
        assert!("0-day".parse::<ReviewPreset>().is_err());
        assert!("400-day".parse::<ReviewPreset>().is_err());
        assert!("soon".parse::<ReviewPreset>().is_err());
        assert!("-day".parse::<ReviewPreset>().is_err());
    }

    #[test]
    fn preset_token_and_label() {
        let one: ReviewPreset = "1-day".parse().unwrap();
        assert_eq!(one.label(), "1 day");
        assert_eq!(ReviewPreset::default().token(), "2-day");
        assert_eq!(ReviewPreset::default().label(), "2 days");
        assert_eq!(ReviewPreset::default().to_string(), "2-day");
    }

    #[test]
    fn malformed_preset_falls_back() {
        let fallback: ReviewPreset = "4-day".parse().unwrap();
        assert_eq!(ReviewPreset::from_token_or(Some("nope"), fallback), fallback);
        assert_eq!(ReviewPreset::from_token_or(None, fallback), fallback);
    }

    #[test]
    fn query_parsing_keeps_expected_encoded() {
        let params = NavParams::from_query("?state=incorrect&expected=Querida%20Ana&firstReview=false");
        assert_eq!(params.state.as_deref(), Some("incorrect"));
        assert_eq!(params.expected.as_deref(), Some("Querida%20Ana"));
        assert_eq!(params.first_review.as_deref(), Some("false"));
        assert_eq!(params.preset, None);
    }

    #[test]
    fn query_plus_is_a_space_but_encoded_plus_survives() {
        let params = NavParams::from_query("state=incorrect&expected=Querida+Ana");
        assert_eq!(params.expected.as_deref(), Some("Querida Ana"));

        let params = NavParams::from_query("expected=1%2B1");
        assert_eq!(params.expected.as_deref(), Some("1%2B1"));
    }

    #[test]
    fn query_aliases_map_to_same_fields() {
        let params = NavParams::from_query("outcome=correct&isFirstReview=1&reviewPreset=3-day");
        let descriptor = params.into_descriptor(ReviewPreset::default());
        assert_eq!(descriptor.outcome, Outcome::Correct);
        assert!(descriptor.is_first_review);
        assert_eq!(descriptor.review_preset.days(), 3);
    }

    #[test]
    fn empty_query_yields_fail_safe_descriptor() {
        let descriptor = NavParams::from_query("").into_descriptor(ReviewPreset::default());
        assert_eq!(descriptor, ResultDescriptor::default());
    }

    #[test]
    fn flag_tokens() {
        for token in ["true", "TRUE", "1", "yes", "on"] {
            assert!(parse_flag(token), "{token} should be true");
        }
        for token in ["false", "0", "", "nah"] {
            assert!(!parse_flag(token), "{token} should be false");
        }
    }

    #[test]
    fn progress_is_clamped_percent() {
        assert_eq!(parse_progress("60"), 60);
        assert_eq!(parse_progress("60%"), 60);
        assert_eq!(parse_progress("250"), 100);
        assert_eq!(parse_progress("-5"), 0);
        assert_eq!(parse_progress("lots"), 0);
    }

    #[test]
    fn empty_expected_answer_is_absent() {
        let descriptor =
            NavParams::from_query("state=incorrect&expected=").into_descriptor(ReviewPreset::default());
        assert_eq!(descriptor.expected_answer, None);
    }

    #[test]
    fn preset_serde_uses_token() {
        let preset: ReviewPreset = "5-day".parse().unwrap();
        let json = serde_json::to_string(&preset).unwrap();
        assert_eq!(json, "\"5-day\"");
        let back: ReviewPreset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, preset);
    }
}

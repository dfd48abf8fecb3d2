use std::borrow::Cow;
use std::time::{Duration, Instant};

use icu_normalizer::ComposingNormalizerBorrowed;
use rand::Rng;

use crate::feedback::{self, FeedbackPlayer};
use crate::session::character::CharacterId;
use crate::session::descriptor::{Outcome, ResultDescriptor, ReviewPreset};
use crate::session::navigation::NavTarget;

/// How long the first-review badge pulses after activation.
pub const BADGE_PULSE: Duration = Duration::from_millis(1200);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresenterOptions {
    /// Offer the review shortcut on the success screen as well.
    pub review_shortcut_on_success: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenVariant {
    Correct,
    Incorrect,
}

impl From<Outcome> for ScreenVariant {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Correct => ScreenVariant::Correct,
            Outcome::Incorrect => ScreenVariant::Incorrect,
        }
    }
}

/// Activation-scoped UI flags. Both booleans only ever go from true to false.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentationState {
    celebration_visible: bool,
    badge_pulsing: bool,
    character: CharacterId,
}

impl PresentationState {
    pub fn celebration_visible(&self) -> bool {
        self.celebration_visible
    }

    pub fn badge_pulsing(&self) -> bool {
        self.badge_pulsing
    }

    pub fn character(&self) -> CharacterId {
        self.character
    }
}

/// Everything the result screen needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderState {
    pub variant: ScreenVariant,
    pub expected_answer: Option<String>,
    pub character: CharacterId,
    pub celebration_visible: bool,
    pub badge_pulsing: bool,
    pub show_review_badge: bool,
    pub review_preset: ReviewPreset,
    pub review_shortcut: bool,
    pub lesson_progress: u8,
}

pub struct ResultPresenter {
    descriptor: ResultDescriptor,
    options: PresenterOptions,
    state: PresentationState,
    expected_answer: Option<String>,
    pulse_deadline: Option<Instant>,
    active: bool,
}

impl ResultPresenter {
    /// Start one activation: request the feedback sound, pick the character
    /// and, for a first review, schedule the end of the badge pulse.
    pub fn activate<R: Rng + ?Sized>(
        descriptor: ResultDescriptor,
        options: PresenterOptions,
        player: &mut dyn FeedbackPlayer,
        rng: &mut R,
        now: Instant,
    ) -> Self {
        log::info!(
            "activating result screen: outcome={} first_review={} preset={}",
            descriptor.outcome.as_str(),
            descriptor.is_first_review,
            descriptor.review_preset
        );

        // Sound goes out before the pulse deadline exists.
        feedback::request_feedback(player, descriptor.outcome);

        let first_review = descriptor.is_first_review;
        let pulse_deadline = first_review.then(|| now + BADGE_PULSE);

        let expected_answer = match descriptor.outcome {
            Outcome::Incorrect => descriptor
                .expected_answer
                .as_deref()
                .map(decode_answer)
                .filter(|answer| !answer.trim().is_empty()),
            Outcome::Correct => None,
        };

        let state = PresentationState {
            celebration_visible: first_review,
            badge_pulsing: first_review,
            character: CharacterId::pick(rng),
        };

        Self {
            descriptor,
            options,
            state,
            expected_answer,
            pulse_deadline,
            active: true,
        }
    }

    pub fn descriptor(&self) -> &ResultDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_pending_pulse(&self) -> bool {
        self.pulse_deadline.is_some()
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            variant: self.descriptor.outcome.into(),
            expected_answer: self.expected_answer.clone(),
            character: self.state.character,
            celebration_visible: self.state.celebration_visible,
            badge_pulsing: self.state.badge_pulsing,
            show_review_badge: self.descriptor.is_first_review,
            review_preset: self.descriptor.review_preset,
            review_shortcut: self.review_shortcut_offered(),
            lesson_progress: self.descriptor.lesson_progress,
        }
    }

    /// Fire the pulse deadline if it has passed.
    pub fn tick(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        if let Some(deadline) = self.pulse_deadline {
            if now >= deadline {
                self.pulse_deadline = None;
                self.state.badge_pulsing = false;
                log::debug!("badge pulse finished");
            }
        }
    }

    pub fn dismiss_celebration(&mut self) {
        if self.state.celebration_visible {
            self.state.celebration_visible = false;
            log::debug!("celebration dismissed");
        }
    }

    /// Depends only on the descriptor, never on whether the overlay was seen.
    pub fn resolve_primary_continue(&self) -> NavTarget {
        if self.descriptor.is_first_review {
            NavTarget::Tip
        } else {
            NavTarget::NextExercise
        }
    }

    pub fn resolve_review_shortcut(&self) -> Option<NavTarget> {
        self.review_shortcut_offered()
            .then_some(NavTarget::Review(self.descriptor.review_preset))
    }

    pub fn resolve_close(&self) -> NavTarget {
        NavTarget::Exit
    }

    /// Tear down the activation. A pending pulse deadline is dropped and
    /// later ticks are ignored.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if self.pulse_deadline.take().is_some() {
            log::debug!("cancelled pending badge pulse");
        }
    }

    fn review_shortcut_offered(&self) -> bool {
        match self.descriptor.outcome {
            Outcome::Incorrect => true,
            Outcome::Correct => self.options.review_shortcut_on_success,
        }
    }
}

/// Percent-decode and NFC-normalise an expected answer for display.
/// Undecodable input is shown as given.
pub fn decode_answer(raw: &str) -> String {
    let decoded = urlencoding::decode(raw).unwrap_or_else(|err| {
        log::warn!("expected answer is not valid percent-encoded UTF-8 ({err}), showing raw text");
        Cow::Borrowed(raw)
    });
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(&decoded)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::feedback::FeedbackCue;
    use crate::feedback::testing::{BrokenPlayer, RecordingPlayer};

    fn descriptor(outcome: Outcome, first_review: bool) -> ResultDescriptor {
        ResultDescriptor {
            outcome,
            expected_answer: None,
            is_first_review: first_review,
            review_preset: ReviewPreset::default(),
            lesson_progress: 60,
        }
    }

    fn activate_at(descriptor: ResultDescriptor, now: Instant) -> (ResultPresenter, RecordingPlayer) {
        let mut player = RecordingPlayer::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let presenter = ResultPresenter::activate(
            descriptor,
            PresenterOptions::default(),
            &mut player,
            &mut rng,
            now,
        );
        (presenter, player)
    }

    #[test]
    fn correct_outcome_plays_only_correct_cue() {
        for first_review in [false, true] {
            let (_, player) = activate_at(descriptor(Outcome::Correct, first_review), Instant::now());
            assert_eq!(player.played, vec![FeedbackCue::Correct]);
        }
    }

    #[test]
    fn incorrect_outcome_plays_only_incorrect_cue() {
        for first_review in [false, true] {
            let (_, player) =
                activate_at(descriptor(Outcome::Incorrect, first_review), Instant::now());
            assert_eq!(player.played, vec![FeedbackCue::Incorrect]);
        }
    }

    #[test]
    fn audio_failure_still_renders() {
        let mut player = BrokenPlayer::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let presenter = ResultPresenter::activate(
            descriptor(Outcome::Correct, true),
            PresenterOptions::default(),
            &mut player,
            &mut rng,
            Instant::now(),
        );
        assert_eq!(player.attempts, 1);
        let render = presenter.render_state();
        assert_eq!(render.variant, ScreenVariant::Correct);
        assert!(render.celebration_visible);
    }

    #[test]
    fn not_first_review_never_pulses_or_celebrates() {
        let t0 = Instant::now();
        let (mut presenter, _) = activate_at(descriptor(Outcome::Correct, false), t0);
        assert!(!presenter.has_pending_pulse());
        for ms in [0, 600, 1200, 5000] {
            presenter.tick(t0 + Duration::from_millis(ms));
            assert!(!presenter.state().celebration_visible());
            assert!(!presenter.state().badge_pulsing());
        }
        presenter.dismiss_celebration();
        assert!(!presenter.state().celebration_visible());
    }

    #[test]
    fn badge_pulse_clears_at_deadline_and_stays_cleared() {
        let t0 = Instant::now();
        let (mut presenter, _) = activate_at(descriptor(Outcome::Correct, true), t0);
        assert!(presenter.state().badge_pulsing());

        presenter.tick(t0 + Duration::from_millis(1199));
        assert!(presenter.state().badge_pulsing());

        presenter.tick(t0 + BADGE_PULSE);
        assert!(!presenter.state().badge_pulsing());
        assert!(!presenter.has_pending_pulse());

        presenter.tick(t0 + Duration::from_millis(5000));
        assert!(!presenter.state().badge_pulsing());
    }

    #[test]
    fn celebration_outlives_pulse_until_dismissed() {
        let t0 = Instant::now();
        let (mut presenter, _) = activate_at(descriptor(Outcome::Correct, true), t0);
        presenter.tick(t0 + Duration::from_millis(3000));
        assert!(presenter.state().celebration_visible());
        presenter.dismiss_celebration();
        assert!(!presenter.state().celebration_visible());
    }

    #[test]
    fn dismiss_is_idempotent() {
        let (mut once, _) = activate_at(descriptor(Outcome::Correct, true), Instant::now());
        let (mut twice, _) = activate_at(descriptor(Outcome::Correct, true), Instant::now());
        once.dismiss_celebration();
        twice.dismiss_celebration();
        twice.dismiss_celebration();
        assert_eq!(once.render_state(), twice.render_state());
    }

    #[test]
    fn deactivate_cancels_pending_pulse() {
        let t0 = Instant::now();
        let (mut presenter, _) = activate_at(descriptor(Outcome::Correct, true), t0);
        presenter.deactivate();
        assert!(!presenter.is_active());
        assert!(!presenter.has_pending_pulse());

        presenter.tick(t0 + Duration::from_millis(2000));
        assert!(presenter.state().badge_pulsing());
    }

    #[test]
    fn primary_continue_ignores_overlay_state() {
        let (mut presenter, _) = activate_at(descriptor(Outcome::Correct, true), Instant::now());
        assert_eq!(presenter.resolve_primary_continue(), NavTarget::Tip);
        presenter.dismiss_celebration();
        assert_eq!(presenter.resolve_primary_continue(), NavTarget::Tip);

        let (presenter, _) = activate_at(descriptor(Outcome::Incorrect, false), Instant::now());
        assert_eq!(presenter.resolve_primary_continue(), NavTarget::NextExercise);
    }

    #[test]
    fn review_shortcut_only_on_failure_by_default() {
        let (presenter, _) = activate_at(descriptor(Outcome::Correct, false), Instant::now());
        assert_eq!(presenter.resolve_review_shortcut(), None);
        assert!(!presenter.render_state().review_shortcut);

        let mut failing = descriptor(Outcome::Incorrect, false);
        failing.review_preset = "4-day".parse().unwrap();
        let (presenter, _) = activate_at(failing, Instant::now());
        assert_eq!(
            presenter.resolve_review_shortcut(),
            Some(NavTarget::Review("4-day".parse().unwrap()))
        );
    }

    #[test]
    fn review_shortcut_on_success_when_enabled() {
        let mut player = RecordingPlayer::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let presenter = ResultPresenter::activate(
            descriptor(Outcome::Correct, false),
            PresenterOptions {
                review_shortcut_on_success: true,
            },
            &mut player,
            &mut rng,
            Instant::now(),
        );
        assert_eq!(
            presenter.resolve_review_shortcut(),
            Some(NavTarget::Review(ReviewPreset::default()))
        );
    }

    #[test]
    fn expected_answer_decoded_on_failure() {
        let mut failing = descriptor(Outcome::Incorrect, false);
        failing.expected_answer = Some("%C2%BFc%C3%B3mo%20est%C3%A1s%3F".to_string());
        let (presenter, _) = activate_at(failing, Instant::now());
        assert_eq!(
            presenter.render_state().expected_answer.as_deref(),
            Some("¿cómo estás?")
        );
    }

    #[test]
    fn blank_expected_answer_is_not_shown() {
        for raw in ["", "%20%20", "   "] {
            let mut failing = descriptor(Outcome::Incorrect, false);
            failing.expected_answer = Some(raw.to_string());
            let (presenter, _) = activate_at(failing, Instant::now());
            assert_eq!(presenter.render_state().expected_answer, None, "{raw:?}");
        }
    }

    #[test]
    fn expected_answer_hidden_on_success() {
        let mut passing = descriptor(Outcome::Correct, false);
        passing.expected_answer = Some("Querida Ana".to_string());
        let (presenter, _) = activate_at(passing, Instant::now());
        assert_eq!(presenter.render_state().expected_answer, None);
    }

    #[test]
    fn character_is_frozen_for_the_activation() {
        let t0 = Instant::now();
        let (mut presenter, _) = activate_at(descriptor(Outcome::Correct, true), t0);
        let first = presenter.render_state().character;
        for ms in [100, 1300, 4000] {
            presenter.tick(t0 + Duration::from_millis(ms));
            assert_eq!(presenter.render_state().character, first);
        }
        presenter.dismiss_celebration();
        assert_eq!(presenter.render_state().character, first);
    }

    #[test]
    fn decode_handles_plain_invalid_and_decomposed_text() {
        assert_eq!(decode_answer("Querida Ana"), "Querida Ana");
        assert_eq!(decode_answer("%FF%FE"), "%FF%FE");
        assert_eq!(decode_answer("esta%CC%81s"), "estás");
        assert_eq!(decode_answer("o\u{301}"), "ó");
    }
}

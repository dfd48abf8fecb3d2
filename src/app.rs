use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::feedback::{FeedbackPlayer, Muted, TerminalBell};
use crate::session::descriptor::ResultDescriptor;
use crate::session::navigation::NavTarget;
use crate::session::presenter::{RenderState, ResultPresenter};
use crate::ui::components::confetti::Confetti;
use crate::ui::theme::Theme;

/// Ticks per blink half-period of the pulsing badge (100 ms ticks).
const PULSE_BLINK_TICKS: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Continue,
    Review,
    Close,
    Dismiss,
}

pub struct App {
    pub presenter: ResultPresenter,
    pub theme: &'static Theme,
    pub config: Config,
    pub confetti: Option<Confetti>,
    pub decision: Option<NavTarget>,
    pub should_quit: bool,
    ticks: u64,
}

impl App {
    pub fn new(descriptor: ResultDescriptor, config: Config, theme: &'static Theme, now: Instant) -> Self {
        let mut player: Box<dyn FeedbackPlayer> = if config.sound_enabled {
            Box::new(TerminalBell::stderr())
        } else {
            Box::new(Muted)
        };
        let mut rng = SmallRng::from_entropy();
        Self::with_parts(descriptor, config, theme, player.as_mut(), &mut rng, now)
    }

    pub fn with_parts(
        descriptor: ResultDescriptor,
        config: Config,
        theme: &'static Theme,
        player: &mut dyn FeedbackPlayer,
        rng: &mut SmallRng,
        now: Instant,
    ) -> Self {
        let first_review = descriptor.is_first_review;
        let presenter =
            ResultPresenter::activate(descriptor, config.presenter_options(), player, rng, now);
        let confetti = first_review.then(|| Confetti::burst(config.confetti_pieces, rng, now));

        Self {
            presenter,
            theme,
            config,
            confetti,
            decision: None,
            should_quit: false,
            ticks: 0,
        }
    }

    pub fn render_state(&self) -> RenderState {
        self.presenter.render_state()
    }

    pub fn pulse_on(&self) -> bool {
        (self.ticks / PULSE_BLINK_TICKS) % 2 == 0
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.ticks = self.ticks.wrapping_add(1);
        self.advance(now);
    }

    /// Fire due timers. Runs on every event so a stream of key presses
    /// cannot hold the badge pulse past its deadline.
    pub fn advance(&mut self, now: Instant) {
        self.presenter.tick(now);
        if self
            .confetti
            .as_ref()
            .is_some_and(|confetti| !confetti.is_active(now))
        {
            self.confetti = None;
        }
    }

    /// While the celebration is up it captures input: only dismissing
    /// (or closing) gets through.
    pub fn handle(&mut self, action: Action, now: Instant) {
        self.advance(now);
        if self.presenter.state().celebration_visible() {
            match action {
                Action::Continue | Action::Dismiss => self.presenter.dismiss_celebration(),
                Action::Close => self.navigate(self.presenter.resolve_close()),
                Action::Review => {}
            }
            return;
        }

        match action {
            Action::Continue => self.navigate(self.presenter.resolve_primary_continue()),
            Action::Review => {
                if let Some(target) = self.presenter.resolve_review_shortcut() {
                    self.navigate(target);
                }
            }
            Action::Close => self.navigate(self.presenter.resolve_close()),
            Action::Dismiss => {}
        }
    }

    /// Leave without a navigation decision (interrupt).
    pub fn abort(&mut self) {
        log::info!("result screen interrupted without a decision");
        self.presenter.deactivate();
        self.should_quit = true;
    }

    fn navigate(&mut self, target: NavTarget) {
        if self.decision.is_some() {
            return;
        }
        log::info!("leaving result screen for {} ({})", target.kind(), target.route());
        self.presenter.deactivate();
        self.confetti = None;
        self.decision = Some(target);
        self.should_quit = true;
    }
}

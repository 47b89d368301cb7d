use crate::ease::Ease;
use crate::error::{SceneError, SceneResult};
use crate::page::{Curtain, Namespace, Page};
use crate::timeline::{Tween, TweenTarget};

/// Fade duration when leaving the home page, time-units.
pub const HOME_LEAVE_FADE: f64 = 0.5;
/// Curtain travel duration, both directions, time-units.
pub const CURTAIN_DURATION: f64 = 0.3;
/// Fade duration for outgoing-inside content and all entering content.
pub const ENTER_FADE: f64 = 0.5;

/// Where a transition currently is. Terminal states return to `Idle` when
/// their entering animation completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum TransitionPhase {
    #[default]
    Idle,
    LeavingHome,
    EnteringHome,
    LeavingInside,
    EnteringInside,
}

/// Milestones the transition timeline reports back through
/// [`crate::timeline::Timeline::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    HomeLeaveDone,
    HomeEnterDone,
    InsideLeaveDone,
    InsideEnterDone,
}

/// A navigation handed in by whatever routes pages, keyed by the outgoing
/// page's namespace.
#[derive(Clone, Debug)]
pub struct NavigationEvent {
    pub from: Namespace,
    pub next: Page,
}

/// Session surface the transition choreography needs.
///
/// The controller is a pure state machine over this trait; the session
/// provides the real wiring and tests can provide a recording fake.
pub trait TransitionHost {
    /// Park the incoming page until promotion.
    fn stage_incoming(&mut self, page: Page);
    /// Make the staged page the current one.
    fn promote_incoming(&mut self) -> SceneResult<()>;
    /// Disable the active scroll adapter.
    fn disable_scroll(&mut self);
    /// Construct and enable a fresh scroll adapter for the current page.
    fn install_scroll(&mut self, horizontal: bool) -> SceneResult<()>;
    /// Tear down tracked images and quads, re-scan the current page,
    /// re-run resize, and re-bind click listeners.
    fn rebuild_tracked(&mut self) -> SceneResult<()>;
    /// Set the advisory flag freezing geometry position writes.
    fn set_transition_flag(&mut self, running: bool);
    /// Show or hide the GPU render container.
    fn set_container_visible(&mut self, visible: bool);
    /// Snap the current page's content opacity.
    fn set_page_opacity(&mut self, opacity: f64);
    /// Enqueue a tween on the shared timeline.
    fn schedule(&mut self, tween: Tween<TransitionEvent>);
}

/// Explicit tagged-variant state machine for page transitions.
///
/// Driven by [`NavigationEvent`]s on one side and timeline completion
/// events on the other; every side effect goes through the host.
#[derive(Debug, Default)]
pub struct TransitionController {
    phase: TransitionPhase,
}

impl TransitionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Start a transition from `Idle`.
    pub fn begin(
        &mut self,
        event: NavigationEvent,
        host: &mut dyn TransitionHost,
    ) -> SceneResult<()> {
        if self.phase != TransitionPhase::Idle {
            return Err(SceneError::transition(format!(
                "navigation while a transition is running ({:?})",
                self.phase
            )));
        }

        tracing::debug!(from = %event.from, to = %event.next.namespace, "transition starting");
        host.stage_incoming(event.next);

        match event.from {
            Namespace::Home => {
                self.phase = TransitionPhase::LeavingHome;
                host.set_transition_flag(true);
                host.disable_scroll();
                host.schedule(
                    Tween::to(TweenTarget::PageOpacity, 0.0, HOME_LEAVE_FADE)
                        .ease(Ease::Linear)
                        .on_complete(TransitionEvent::HomeLeaveDone),
                );
            }
            Namespace::Inside => {
                self.phase = TransitionPhase::LeavingInside;
                host.disable_scroll();
                // Curtain drops first; the fade only starts once it covers.
                host.schedule(
                    Tween::to(TweenTarget::CurtainY, Curtain::COVERING_Y, CURTAIN_DURATION)
                        .ease(Ease::Linear),
                );
                host.schedule(
                    Tween::to(TweenTarget::PageOpacity, 0.0, ENTER_FADE)
                        .ease(Ease::Linear)
                        .at(CURTAIN_DURATION)
                        .on_complete(TransitionEvent::InsideLeaveDone),
                );
            }
        }
        Ok(())
    }

    /// Advance the machine on a timeline milestone.
    pub fn on_event(
        &mut self,
        event: TransitionEvent,
        host: &mut dyn TransitionHost,
    ) -> SceneResult<()> {
        match (self.phase, event) {
            (TransitionPhase::LeavingHome, TransitionEvent::HomeLeaveDone) => {
                self.phase = TransitionPhase::EnteringHome;
                host.promote_incoming()?;
                host.install_scroll(false)?;
                host.set_page_opacity(0.0);
                host.schedule(
                    Tween::to(TweenTarget::PageOpacity, 1.0, ENTER_FADE)
                        .ease(Ease::Linear)
                        .on_complete(TransitionEvent::HomeEnterDone),
                );
            }
            (TransitionPhase::EnteringHome, TransitionEvent::HomeEnterDone) => {
                host.set_container_visible(false);
                host.set_transition_flag(false);
                self.phase = TransitionPhase::Idle;
                tracing::debug!("home transition settled");
            }
            (TransitionPhase::LeavingInside, TransitionEvent::InsideLeaveDone) => {
                self.phase = TransitionPhase::EnteringInside;
                host.promote_incoming()?;
                host.install_scroll(true)?;
                host.rebuild_tracked()?;
                host.set_container_visible(true);
                host.schedule(
                    Tween::to(TweenTarget::CurtainY, Curtain::HIDDEN_Y, CURTAIN_DURATION)
                        .ease(Ease::Linear),
                );
                host.set_page_opacity(0.0);
                host.schedule(
                    Tween::to(TweenTarget::PageOpacity, 1.0, ENTER_FADE)
                        .ease(Ease::Linear)
                        .at(CURTAIN_DURATION)
                        .on_complete(TransitionEvent::InsideEnterDone),
                );
            }
            (TransitionPhase::EnteringInside, TransitionEvent::InsideEnterDone) => {
                self.phase = TransitionPhase::Idle;
                tracing::debug!("inside transition settled");
            }
            (phase, event) => {
                return Err(SceneError::transition(format!(
                    "unexpected {event:?} in phase {phase:?}"
                )));
            }
        }
        Ok(())
    }
}

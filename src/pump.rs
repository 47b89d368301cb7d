use std::time::Instant;

use crate::error::SceneResult;
use crate::render::RenderBackend;
use crate::session::Session;

/// Source of per-frame elapsed time for the timeline.
pub trait FrameClock {
    /// Time-units elapsed since the previous frame.
    fn frame_delta(&mut self) -> f64;
}

/// Constant-step clock for deterministic, step-based runs.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    dt: f64,
}

impl FixedClock {
    pub fn new(dt: f64) -> Self {
        Self { dt: dt.max(0.0) }
    }
}

impl FrameClock for FixedClock {
    fn frame_delta(&mut self) -> f64 {
        self.dt
    }
}

/// Wall-clock frame deltas, for hosts driving real display frames.
#[derive(Debug, Default)]
pub struct RealtimeClock {
    last: Option<Instant>,
}

impl RealtimeClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameClock for RealtimeClock {
    fn frame_delta(&mut self) -> f64 {
        let now = Instant::now();
        let dt = self
            .last
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last = Some(now);
        dt
    }
}

/// Run-until-cancelled frame pump.
///
/// Stands in for the browser's self-rescheduling animation frame: each
/// iteration runs one cooperative [`Session::tick`] to completion before
/// the next is considered. There is no stop operation on the session
/// itself; cancelling the pump (or the stop predicate) is what ends a run.
#[derive(Debug, Default)]
pub struct FramePump {
    cancelled: bool,
}

impl FramePump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Tick until `stop` returns true or the pump is cancelled. Returns the
    /// number of frames run.
    pub fn run_until(
        &mut self,
        session: &mut Session,
        backend: &mut dyn RenderBackend,
        clock: &mut dyn FrameClock,
        stop: &mut dyn FnMut(&Session) -> bool,
    ) -> SceneResult<u64> {
        let mut frames = 0;
        while !self.cancelled && !stop(session) {
            session.tick(clock.frame_delta(), backend)?;
            frames += 1;
        }
        Ok(frames)
    }

    /// Tick a fixed number of frames.
    pub fn run_frames(
        &mut self,
        session: &mut Session,
        backend: &mut dyn RenderBackend,
        clock: &mut dyn FrameClock,
        frames: u64,
    ) -> SceneResult<u64> {
        let target = session.frames_rendered() + frames;
        self.run_until(session, backend, clock, &mut |s: &Session| {
            s.frames_rendered() >= target
        })
    }
}

use crate::ease::Ease;
use crate::uniforms::CornerChannel;

/// A scalar field the timeline can drive.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TweenTarget {
    /// One component of a tracked image's corner-reveal vector.
    Corner { image: String, channel: CornerChannel },
    /// Content opacity of the session's current page.
    PageOpacity,
    /// Curtain overlay translate, in percent.
    CurtainY,
}

/// Host state the timeline reads from and writes to.
///
/// Keeping this a trait keeps the timeline testable against a plain map of
/// scalars, with the session providing the real wiring.
pub trait TweenHost {
    fn read(&self, target: &TweenTarget) -> f64;
    fn write(&mut self, target: &TweenTarget, value: f64);
}

/// One scheduled value ramp.
///
/// The starting value is captured lazily from the host the first time the
/// playhead reaches the tween, matching how in-flight state composes when
/// several tweens drive the same target: the later-scheduled tween picks up
/// wherever earlier ones left the value.
#[derive(Clone, Debug)]
pub struct Tween<E> {
    target: TweenTarget,
    to: f64,
    /// Offset from the timeline position at schedule time; becomes an
    /// absolute playhead time once scheduled.
    start: f64,
    duration: f64,
    ease: Ease,
    complete: Option<E>,
    from: Option<f64>,
    done: bool,
}

impl<E> Tween<E> {
    pub fn to(target: TweenTarget, to: f64, duration: f64) -> Self {
        Self {
            target,
            to,
            start: 0.0,
            duration,
            ease: Ease::default(),
            complete: None,
            from: None,
            done: false,
        }
    }

    /// Delay the start relative to the timeline position at schedule time.
    pub fn at(mut self, offset: f64) -> Self {
        self.start = offset;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Event emitted from `advance` when this tween finishes.
    pub fn on_complete(mut self, event: E) -> Self {
        self.complete = Some(event);
        self
    }
}

/// Shared tween timeline.
///
/// The playhead only moves forward; repeated interactions append more
/// tweens rather than rewinding. Tweens are applied in insertion order each
/// frame, so when two drive the same target the later-scheduled one wins.
#[derive(Debug)]
pub struct Timeline<E> {
    position: f64,
    tweens: Vec<Tween<E>>,
}

impl<E: Clone> Timeline<E> {
    pub fn new() -> Self {
        Self {
            position: 0.0,
            tweens: Vec::new(),
        }
    }

    /// Current playhead position in time-units.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Number of tweens that have not yet finished.
    pub fn pending(&self) -> usize {
        self.tweens.iter().filter(|t| !t.done).count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Enqueue a tween; its `at` offset is resolved against the current
    /// playhead position.
    pub fn schedule(&mut self, mut tween: Tween<E>) {
        tween.start += self.position;
        self.tweens.push(tween);
    }

    /// Advance the playhead by `dt` and apply every active tween to the
    /// host. Returns completion events in the order tweens finished.
    pub fn advance(&mut self, dt: f64, host: &mut dyn TweenHost) -> Vec<E> {
        self.position += dt.max(0.0);
        let mut events = Vec::new();

        for tween in &mut self.tweens {
            if tween.done || self.position < tween.start {
                continue;
            }
            let from = match tween.from {
                Some(f) => f,
                None => {
                    let f = host.read(&tween.target);
                    tween.from = Some(f);
                    f
                }
            };

            let t = if tween.duration > 0.0 {
                ((self.position - tween.start) / tween.duration).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let value = from + (tween.to - from) * tween.ease.apply(t);
            host.write(&tween.target, value);

            if t >= 1.0 {
                tween.done = true;
                if let Some(ev) = tween.complete.take() {
                    events.push(ev);
                }
            }
        }

        self.tweens.retain(|t| !t.done);
        events
    }
}

impl<E: Clone> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MapHost(BTreeMap<String, f64>);

    impl MapHost {
        fn key(target: &TweenTarget) -> String {
            match target {
                TweenTarget::Corner { image, channel } => format!("{image}.{channel:?}"),
                TweenTarget::PageOpacity => "opacity".to_string(),
                TweenTarget::CurtainY => "curtain".to_string(),
            }
        }
    }

    impl TweenHost for MapHost {
        fn read(&self, target: &TweenTarget) -> f64 {
            *self.0.get(&Self::key(target)).unwrap_or(&0.0)
        }

        fn write(&mut self, target: &TweenTarget, value: f64) {
            self.0.insert(Self::key(target), value);
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Ev {
        Done,
    }

    #[test]
    fn linear_tween_reaches_target_and_fires_once() {
        let mut tl = Timeline::new();
        let mut host = MapHost::default();
        tl.schedule(
            Tween::to(TweenTarget::CurtainY, 1.0, 0.4)
                .ease(Ease::Linear)
                .on_complete(Ev::Done),
        );

        assert!(tl.advance(0.2, &mut host).is_empty());
        assert!((host.read(&TweenTarget::CurtainY) - 0.5).abs() < 1e-12);

        let events = tl.advance(0.2, &mut host);
        assert_eq!(events, vec![Ev::Done]);
        assert_eq!(host.read(&TweenTarget::CurtainY), 1.0);

        assert!(tl.advance(1.0, &mut host).is_empty());
        assert!(tl.is_idle());
    }

    #[test]
    fn offset_tween_stays_untouched_until_start() {
        let mut tl = Timeline::<Ev>::new();
        let mut host = MapHost::default();
        tl.schedule(Tween::to(TweenTarget::PageOpacity, 1.0, 0.4).at(0.3));

        tl.advance(0.2, &mut host);
        assert_eq!(host.read(&TweenTarget::PageOpacity), 0.0);

        tl.advance(0.2, &mut host);
        assert!(host.read(&TweenTarget::PageOpacity) > 0.0);
    }

    #[test]
    fn from_value_is_captured_at_activation() {
        let mut tl = Timeline::<Ev>::new();
        let mut host = MapHost::default();
        host.write(&TweenTarget::PageOpacity, 0.6);
        tl.schedule(
            Tween::to(TweenTarget::PageOpacity, 1.0, 1.0)
                .ease(Ease::Linear)
                .at(0.5),
        );

        // Host value moves before the tween activates; the ramp must start
        // from the later value, not the schedule-time one.
        host.write(&TweenTarget::PageOpacity, 0.8);
        tl.advance(0.5, &mut host);
        tl.advance(0.5, &mut host);
        assert!((host.read(&TweenTarget::PageOpacity) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn later_tween_on_same_target_wins_per_frame() {
        let mut tl = Timeline::<Ev>::new();
        let mut host = MapHost::default();
        tl.schedule(Tween::to(TweenTarget::CurtainY, 0.5, 1.0).ease(Ease::Linear));
        tl.schedule(Tween::to(TweenTarget::CurtainY, 1.0, 0.5).ease(Ease::Linear));

        tl.advance(0.5, &mut host);
        // The second tween finished this frame and was applied last.
        assert_eq!(host.read(&TweenTarget::CurtainY), 1.0);
    }

    #[test]
    fn playhead_only_moves_forward() {
        let mut tl = Timeline::<Ev>::new();
        let mut host = MapHost::default();
        tl.advance(0.5, &mut host);
        tl.advance(-3.0, &mut host);
        assert_eq!(tl.position(), 0.5);
    }

    #[test]
    fn schedule_resolves_offsets_against_playhead() {
        let mut tl = Timeline::<Ev>::new();
        let mut host = MapHost::default();
        tl.advance(2.0, &mut host);
        tl.schedule(
            Tween::to(TweenTarget::CurtainY, 1.0, 0.4)
                .ease(Ease::Linear)
                .at(0.1),
        );
        tl.advance(0.05, &mut host);
        assert_eq!(host.read(&TweenTarget::CurtainY), 0.0);
        tl.advance(0.55, &mut host);
        assert_eq!(host.read(&TweenTarget::CurtainY), 1.0);
    }
}

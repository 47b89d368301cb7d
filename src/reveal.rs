use std::collections::BTreeSet;

use crate::timeline::{Timeline, Tween, TweenTarget};
use crate::uniforms::CornerChannel;

/// Duration of each corner component's ramp, in time-units.
pub const REVEAL_DURATION: f64 = 0.4;

/// Start offsets for the x/y/z/w components, from click time. Each
/// component starts before the previous finishes, giving a staggered wipe.
pub const REVEAL_STAGGER: [f64; 4] = [0.0, 0.1, 0.2, 0.3];

/// What a click on an already-revealing image does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetriggerPolicy {
    /// Every click enqueues a fresh wipe, even mid-flight (the original
    /// behavior).
    #[default]
    AllowRetrigger,
    /// Clicks are ignored once a reveal has started, until a rebuild.
    IgnoreWhileRevealed,
}

/// Click listeners for the tracked image set.
///
/// Listener state lives apart from [`crate::sync::TrackedImage`] so a page
/// rebuild can re-bind from the new tracked set in one call, which is also
/// the only thing that resets reveal bookkeeping.
#[derive(Debug, Default)]
pub struct ClickBindings {
    policy: RetriggerPolicy,
    bound: BTreeSet<String>,
    started: BTreeSet<String>,
}

impl ClickBindings {
    pub fn new(policy: RetriggerPolicy) -> Self {
        Self {
            policy,
            bound: BTreeSet::new(),
            started: BTreeSet::new(),
        }
    }

    pub fn policy(&self) -> RetriggerPolicy {
        self.policy
    }

    pub fn is_bound(&self, element: &str) -> bool {
        self.bound.contains(element)
    }

    /// Replace all bindings with the given element set, clearing reveal
    /// bookkeeping.
    pub fn rebind<'a>(&mut self, elements: impl IntoIterator<Item = &'a str>) {
        self.bound = elements.into_iter().map(str::to_string).collect();
        self.started.clear();
    }

    /// Handle a click on an element. When the element is bound (and the
    /// policy allows), schedules the four-component staggered wipe on the
    /// shared timeline and returns `true`.
    pub fn click<E: Clone>(&mut self, element: &str, timeline: &mut Timeline<E>) -> bool {
        if !self.bound.contains(element) {
            return false;
        }
        if self.policy == RetriggerPolicy::IgnoreWhileRevealed && self.started.contains(element) {
            tracing::debug!(%element, "reveal retrigger ignored");
            return false;
        }

        for (channel, offset) in CornerChannel::ALL.into_iter().zip(REVEAL_STAGGER) {
            timeline.schedule(
                Tween::to(
                    TweenTarget::Corner {
                        image: element.to_string(),
                        channel,
                    },
                    1.0,
                    REVEAL_DURATION,
                )
                .at(offset),
            );
        }
        self.started.insert(element.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TweenHost;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Corners(BTreeMap<(String, u8), f64>);

    fn channel_index(c: CornerChannel) -> u8 {
        match c {
            CornerChannel::X => 0,
            CornerChannel::Y => 1,
            CornerChannel::Z => 2,
            CornerChannel::W => 3,
        }
    }

    impl TweenHost for Corners {
        fn read(&self, target: &TweenTarget) -> f64 {
            match target {
                TweenTarget::Corner { image, channel } => *self
                    .0
                    .get(&(image.clone(), channel_index(*channel)))
                    .unwrap_or(&0.0),
                _ => 0.0,
            }
        }

        fn write(&mut self, target: &TweenTarget, value: f64) {
            if let TweenTarget::Corner { image, channel } = target {
                self.0.insert((image.clone(), channel_index(*channel)), value);
            }
        }
    }

    fn corner(host: &Corners, c: CornerChannel) -> f64 {
        host.read(&TweenTarget::Corner {
            image: "a".to_string(),
            channel: c,
        })
    }

    #[test]
    fn unbound_elements_ignore_clicks() {
        let mut bindings = ClickBindings::new(RetriggerPolicy::AllowRetrigger);
        let mut tl = Timeline::<()>::new();
        assert!(!bindings.click("ghost", &mut tl));
        assert!(tl.is_idle());
    }

    #[test]
    fn click_schedules_staggered_wipe() {
        let mut bindings = ClickBindings::new(RetriggerPolicy::AllowRetrigger);
        bindings.rebind(["a"]);
        let mut tl = Timeline::<()>::new();
        let mut host = Corners::default();

        assert!(bindings.click("a", &mut tl));
        assert_eq!(tl.pending(), 4);

        // Before 0.3 time-units the w component has not started.
        tl.advance(0.2, &mut host);
        assert_eq!(corner(&host, CornerChannel::W), 0.0);
        assert!(corner(&host, CornerChannel::X) > 0.0);

        // After 0.7 time-units all four components are fully revealed.
        for _ in 0..5 {
            tl.advance(0.1, &mut host);
        }
        for c in CornerChannel::ALL {
            assert!((corner(&host, c) - 1.0).abs() < 1e-9, "{c:?} not revealed");
        }
    }

    #[test]
    fn components_never_decrease_once_started() {
        let mut bindings = ClickBindings::new(RetriggerPolicy::AllowRetrigger);
        bindings.rebind(["a"]);
        let mut tl = Timeline::<()>::new();
        let mut host = Corners::default();

        bindings.click("a", &mut tl);
        let mut prev = [0.0f64; 4];
        for _ in 0..20 {
            tl.advance(0.05, &mut host);
            // A mid-flight re-click piles more tweens onto the timeline.
            if tl.position() > 0.2 && tl.position() < 0.3 {
                bindings.click("a", &mut tl);
            }
            for (i, c) in CornerChannel::ALL.into_iter().enumerate() {
                let v = corner(&host, c);
                assert!(v >= prev[i] - 1e-12, "{c:?} decreased");
                prev[i] = v;
            }
        }
    }

    #[test]
    fn ignore_while_revealed_suppresses_second_click() {
        let mut bindings = ClickBindings::new(RetriggerPolicy::IgnoreWhileRevealed);
        bindings.rebind(["a"]);
        let mut tl = Timeline::<()>::new();

        assert!(bindings.click("a", &mut tl));
        assert!(!bindings.click("a", &mut tl));
        assert_eq!(tl.pending(), 4);

        // A rebuild resets the bookkeeping.
        bindings.rebind(["a"]);
        assert!(bindings.click("a", &mut tl));
    }
}

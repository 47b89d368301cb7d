use std::path::PathBuf;

use crate::core::Viewport;
use crate::error::{SceneError, SceneResult};
use crate::page::{Curtain, Page};
use crate::render::RenderBackend;
use crate::reveal::{ClickBindings, RetriggerPolicy};
use crate::scene::Scene;
use crate::scroll::{ScrollAdapter, ScrollOptions};
use crate::sync::{GeometrySync, TrackedImage};
use crate::texture::TextureStore;
use crate::timeline::{Timeline, Tween, TweenHost, TweenTarget};
use crate::transition::{
    NavigationEvent, TransitionController, TransitionEvent, TransitionHost, TransitionPhase,
};
use crate::uniforms::UniformSet;

/// Fixed per-frame shader time increment. Unbounded by design; wrapping is
/// the shader's concern.
pub const TIME_STEP: f32 = 0.05;

/// Construction options for a [`Session`].
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub viewport: Viewport,
    pub retrigger: RetriggerPolicy,
    pub scroll_smoothing: f64,
    /// Root directory texture sources resolve against.
    pub assets_root: PathBuf,
}

impl SessionOptions {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            retrigger: RetriggerPolicy::default(),
            scroll_smoothing: ScrollOptions::DEFAULT_SMOOTHING,
            assets_root: PathBuf::from("."),
        }
    }
}

/// The whole experience behind one render surface: scene, scroll, tracked
/// images, shared timeline, and the transition machine, as one explicit
/// context object.
pub struct Session {
    viewport: Viewport,
    time: f32,
    frames: u64,

    scene: Scene,
    template: UniformSet,
    textures: TextureStore,
    sync: GeometrySync,
    bindings: ClickBindings,
    timeline: Timeline<TransitionEvent>,
    scroll: ScrollAdapter,
    transition: TransitionController,

    /// Advisory flag: while a transition animation runs, per-frame position
    /// writes are suppressed so the fade and the scroll-driven positioning
    /// never fight over layout.
    transition_running: bool,
    container_visible: bool,
    curtain: Curtain,

    current: Page,
    incoming: Option<Page>,

    scroll_smoothing: f64,
}

impl Session {
    pub fn new(page: Page, opts: SessionOptions) -> SceneResult<Self> {
        page.validate()?;

        let horizontal = page.namespace.horizontal_scroll();
        let mut scroll = ScrollAdapter::new(ScrollOptions {
            horizontal,
            smoothing: opts.scroll_smoothing,
            content_length: page.scroll_length,
            viewport_length: opts.viewport.scroll_extent(horizontal),
        })?;
        scroll.enable();

        let mut session = Self {
            viewport: opts.viewport,
            time: 0.0,
            frames: 0,
            scene: Scene::new(opts.viewport),
            template: UniformSet::template(opts.viewport),
            textures: TextureStore::new(opts.assets_root),
            sync: GeometrySync::new(),
            bindings: ClickBindings::new(opts.retrigger),
            timeline: Timeline::new(),
            scroll,
            transition: TransitionController::new(),
            transition_running: false,
            container_visible: true,
            curtain: Curtain::default(),
            current: page,
            incoming: None,
            scroll_smoothing: opts.scroll_smoothing,
        };
        session.rebuild_tracked()?;
        Ok(session)
    }

    /// One cooperative frame: advance time, run due tweens, update scroll,
    /// recompute quad positions, draw. Returns before the next frame may
    /// start; there is no overlapping invocation.
    #[tracing::instrument(skip(self, backend), fields(frame = self.frames))]
    pub fn tick(&mut self, dt: f64, backend: &mut dyn RenderBackend) -> SceneResult<()> {
        self.time += TIME_STEP;
        self.template.time = self.time;
        for quad in self.scene.quads_mut() {
            quad.uniforms.time = self.time;
        }

        let events = {
            let mut host = HostView {
                scene: &mut self.scene,
                images: self.sync.images(),
                page: &mut self.current,
                curtain: &mut self.curtain,
            };
            self.timeline.advance(dt, &mut host)
        };
        for event in events {
            self.apply_transition_event(event)?;
        }

        self.scroll.update();
        self.sync.set_positions(
            &mut self.scene,
            self.scroll.current_pos(),
            self.viewport,
            self.transition_running,
        );

        backend.draw(&self.scene)?;
        self.frames += 1;
        Ok(())
    }

    /// Full layout recompute, run on every window resize. No debouncing.
    pub fn resize_viewport(&mut self, viewport: Viewport) -> SceneResult<()> {
        self.viewport = viewport;
        self.refresh_layout()
    }

    /// Click on a page element. Returns whether a reveal was scheduled.
    pub fn click(&mut self, element: &str) -> bool {
        self.bindings.click(element, &mut self.timeline)
    }

    /// Apply a wheel/drag delta to the active scroll surface.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll.scroll_by(delta);
    }

    /// Feed a navigation from the page router.
    pub fn navigate(&mut self, next: Page) -> SceneResult<()> {
        next.validate()?;
        let event = NavigationEvent {
            from: self.current.namespace,
            next,
        };
        let mut ctl = std::mem::take(&mut self.transition);
        let res = ctl.begin(event, self);
        self.transition = ctl;
        res
    }

    fn apply_transition_event(&mut self, event: TransitionEvent) -> SceneResult<()> {
        let mut ctl = std::mem::take(&mut self.transition);
        let res = ctl.on_event(event, self);
        self.transition = ctl;
        res
    }

    fn refresh_layout(&mut self) -> SceneResult<()> {
        self.sync.resize(
            &mut self.scene,
            &mut self.template,
            &self.current,
            &self.scroll,
            self.viewport,
        )
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn images(&self) -> &[TrackedImage] {
        self.sync.images()
    }

    pub fn page(&self) -> &Page {
        &self.current
    }

    pub fn curtain(&self) -> Curtain {
        self.curtain
    }

    pub fn scroll(&self) -> &ScrollAdapter {
        &self.scroll
    }

    pub fn transition_phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    pub fn is_transition_running(&self) -> bool {
        self.transition_running
    }

    pub fn container_visible(&self) -> bool {
        self.container_visible
    }

    /// Nothing animating and no transition in flight.
    pub fn is_settled(&self) -> bool {
        self.transition.phase() == TransitionPhase::Idle && self.timeline.is_idle()
    }
}

/// Disjoint view over the session fields the timeline may touch while the
/// timeline itself is mutably borrowed.
struct HostView<'a> {
    scene: &'a mut Scene,
    images: &'a [TrackedImage],
    page: &'a mut Page,
    curtain: &'a mut Curtain,
}

impl HostView<'_> {
    fn corner(&self, image: &str) -> Option<&TrackedImage> {
        self.images.iter().find(|i| i.element == image)
    }
}

impl TweenHost for HostView<'_> {
    fn read(&self, target: &TweenTarget) -> f64 {
        match target {
            TweenTarget::Corner { image, channel } => self
                .corner(image)
                .and_then(|i| self.scene.quad(i.quad))
                .map(|q| f64::from(q.uniforms.corners.channel(*channel)))
                .unwrap_or(0.0),
            TweenTarget::PageOpacity => self.page.opacity,
            TweenTarget::CurtainY => self.curtain.y,
        }
    }

    fn write(&mut self, target: &TweenTarget, value: f64) {
        match target {
            TweenTarget::Corner { image, channel } => {
                // Tweens scheduled before a rebuild may outlive their
                // target; those writes drop on the floor.
                let Some(quad) = self.corner(image).map(|i| i.quad) else {
                    return;
                };
                if let Some(q) = self.scene.quad_mut(quad) {
                    q.uniforms.corners.set_channel(*channel, value as f32);
                }
            }
            TweenTarget::PageOpacity => self.page.opacity = value,
            TweenTarget::CurtainY => self.curtain.y = value,
        }
    }
}

impl TransitionHost for Session {
    fn stage_incoming(&mut self, page: Page) {
        self.incoming = Some(page);
    }

    fn promote_incoming(&mut self) -> SceneResult<()> {
        self.current = self
            .incoming
            .take()
            .ok_or_else(|| SceneError::transition("no staged page to promote"))?;
        Ok(())
    }

    fn disable_scroll(&mut self) {
        self.scroll.disable();
    }

    fn install_scroll(&mut self, horizontal: bool) -> SceneResult<()> {
        if !self.current.has_scroll_container {
            return Err(SceneError::page(format!(
                "page '{}' has no scroll container",
                self.current.namespace
            )));
        }
        let mut scroll = ScrollAdapter::new(ScrollOptions {
            horizontal,
            smoothing: self.scroll_smoothing,
            content_length: self.current.scroll_length,
            viewport_length: self.viewport.scroll_extent(horizontal),
        })?;
        scroll.enable();
        self.scroll = scroll;
        Ok(())
    }

    fn rebuild_tracked(&mut self) -> SceneResult<()> {
        self.sync.rebuild(
            &mut self.scene,
            &self.template,
            &mut self.textures,
            &self.current,
            &self.scroll,
        )?;
        self.refresh_layout()?;
        let ids: Vec<String> = self
            .sync
            .images()
            .iter()
            .map(|i| i.element.clone())
            .collect();
        self.bindings.rebind(ids.iter().map(String::as_str));
        Ok(())
    }

    fn set_transition_flag(&mut self, running: bool) {
        self.transition_running = running;
    }

    fn set_container_visible(&mut self, visible: bool) {
        self.container_visible = visible;
    }

    fn set_page_opacity(&mut self, opacity: f64) {
        self.current.opacity = opacity;
    }

    fn schedule(&mut self, tween: Tween<TransitionEvent>) {
        self.timeline.schedule(tween);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Bounds, Element, Namespace, IMAGE_MARKER};
    use crate::render::NullBackend;

    fn home_page() -> Page {
        Page {
            namespace: Namespace::Home,
            elements: vec![Element {
                id: "img-1".to_string(),
                classes: vec![IMAGE_MARKER.to_string()],
                bounds: Bounds::new(100.0, 50.0, 200.0, 150.0),
                source: None,
            }],
            scroll_length: 2000.0,
            has_scroll_container: true,
            opacity: 1.0,
        }
    }

    fn session() -> Session {
        Session::new(
            home_page(),
            SessionOptions::new(Viewport::new(800.0, 600.0).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn new_session_tracks_marker_elements() {
        let s = session();
        assert_eq!(s.images().len(), 1);
        assert_eq!(s.scene().len(), 1);
        assert!(s.scroll().is_enabled());
        assert!(s.scroll().horizontal());
        assert!(s.container_visible());
        assert!(s.is_settled());
    }

    #[test]
    fn time_advances_by_fixed_step() {
        let mut s = session();
        let mut backend = NullBackend;
        for _ in 0..10 {
            s.tick(0.016, &mut backend).unwrap();
        }
        assert!((s.time() - 0.5).abs() < 1e-5);
        assert_eq!(s.frames_rendered(), 10);
        let quad = &s.scene().quads()[0];
        assert!((quad.uniforms.time - 0.5).abs() < 1e-5);
    }

    #[test]
    fn click_on_stale_element_is_ignored() {
        let mut s = session();
        assert!(!s.click("not-there"));
        assert!(s.click("img-1"));
    }

    #[test]
    fn navigation_with_staged_page_errors_until_idle() {
        let mut s = session();
        s.navigate(Page {
            namespace: Namespace::Inside,
            elements: Vec::new(),
            scroll_length: 500.0,
            has_scroll_container: true,
            opacity: 1.0,
        })
        .unwrap();
        assert!(s.is_transition_running());
        let err = s
            .navigate(Page {
                namespace: Namespace::Inside,
                elements: Vec::new(),
                scroll_length: 500.0,
                has_scroll_container: true,
                opacity: 1.0,
            })
            .unwrap_err();
        assert!(err.to_string().contains("transition error"));
    }
}

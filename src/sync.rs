use crate::core::{Vec2, Vec2f, Viewport};
use crate::error::{SceneError, SceneResult};
use crate::page::{Bounds, Page};
use crate::scene::{QuadId, Scene};
use crate::scroll::ScrollAdapter;
use crate::texture::TextureStore;
use crate::uniforms::UniformSet;

/// One page element mirrored by a GPU quad, with its cached layout.
///
/// `left` is cached in document space (client left plus the scroll offset
/// at caching time); `top` is the viewport-space top at caching time. Both
/// follow how the per-frame position formula consumes them.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TrackedImage {
    pub element: String,
    pub quad: QuadId,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub left: f64,
}

/// Keeps GPU quads aligned with the tracked elements of the current page.
#[derive(Debug, Default)]
pub struct GeometrySync {
    images: Vec<TrackedImage>,
}

impl GeometrySync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[TrackedImage] {
        &self.images
    }

    /// Drop all tracked images and their quads.
    pub fn clear(&mut self, scene: &mut Scene) {
        scene.clear_quads();
        self.images.clear();
    }

    /// Scan the page for marker-class elements and build one quad per
    /// element, cloning the template uniforms and uploading each element's
    /// bitmap source. A source that fails to decode leaves the quad with an
    /// empty sampler.
    pub fn rebuild(
        &mut self,
        scene: &mut Scene,
        template: &UniformSet,
        textures: &mut TextureStore,
        page: &Page,
        scroll: &ScrollAdapter,
    ) -> SceneResult<()> {
        self.clear(scene);
        let horizontal = scroll.horizontal();
        let scroll_pos = scroll.current_pos();

        for el in page.trackable() {
            let texture = match &el.source {
                Some(source) => match textures.load_source(source) {
                    Ok(id) => Some(id),
                    Err(err) => {
                        tracing::warn!(element = %el.id, %source, error = %err, "texture upload failed");
                        None
                    }
                },
                None => None,
            };

            let bounds = el.client_bounds(scroll_pos, horizontal);
            let quad = scene.add_quad(template.clone_for(texture));
            if let Some(q) = scene.quad_mut(quad) {
                q.scale = Vec2::new(bounds.width, bounds.height);
            }
            self.images.push(TrackedImage {
                element: el.id.clone(),
                quad,
                width: bounds.width,
                height: bounds.height,
                top: bounds.top,
                left: bounds.left + scroll_pos,
            });
        }

        tracing::debug!(count = self.images.len(), "tracked image set rebuilt");
        Ok(())
    }

    /// Re-read every tracked element's bounds and bring quad scale, cached
    /// layout, and size uniforms back in line. Also refreshes the shared
    /// resolution uniform on the template and every quad.
    pub fn resize(
        &mut self,
        scene: &mut Scene,
        template: &mut UniformSet,
        page: &Page,
        scroll: &ScrollAdapter,
        viewport: Viewport,
    ) -> SceneResult<()> {
        scene.camera.set_viewport(viewport);
        template.set_resolution(viewport);
        for quad in scene.quads_mut() {
            quad.uniforms.set_resolution(viewport);
        }

        let horizontal = scroll.horizontal();
        let scroll_pos = scroll.current_pos();
        for image in &mut self.images {
            // An element that left the page reads back like a detached DOM
            // node: an empty rect.
            let bounds = match page.element(&image.element) {
                Some(el) => el.client_bounds(scroll_pos, horizontal),
                None => {
                    tracing::warn!(element = %image.element, "tracked element is detached");
                    Bounds::default()
                }
            };

            image.width = bounds.width;
            image.height = bounds.height;
            image.top = bounds.top;
            image.left = bounds.left + scroll_pos;

            let quad = scene.quad_mut(image.quad).ok_or_else(|| {
                SceneError::page(format!("quad missing for element '{}'", image.element))
            })?;
            quad.scale = Vec2::new(bounds.width, bounds.height);
            quad.uniforms.quad_size = Vec2f::new(bounds.width as f32, bounds.height as f32);
            quad.uniforms.texture_size = Vec2f::new(bounds.width as f32, bounds.height as f32);
        }
        Ok(())
    }

    /// Recompute each quad's position from the cached layout and the
    /// current scroll offset. Frozen while a transition animation runs, so
    /// the transition choreography is the only writer of visual state.
    pub fn set_positions(
        &self,
        scene: &mut Scene,
        scroll_pos: f64,
        viewport: Viewport,
        transition_running: bool,
    ) {
        if transition_running {
            return;
        }
        for image in &self.images {
            let Some(quad) = scene.quad_mut(image.quad) else {
                continue;
            };
            quad.position = Vec2::new(
                -scroll_pos + image.left - viewport.width / 2.0 + image.width / 2.0,
                -image.top + viewport.height / 2.0 - image.height / 2.0,
            );
        }
    }
}

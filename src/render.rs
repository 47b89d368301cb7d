use crate::core::Viewport;
use crate::error::SceneResult;
use crate::scene::{Camera, Quad, Scene};
use crate::texture::TextureId;

/// A renderer that can draw one frame of a [`Scene`] through its camera.
///
/// The engine issues exactly one `draw` per tick; backends own whatever
/// GPU or recording state that implies.
pub trait RenderBackend {
    fn draw(&mut self, scene: &Scene) -> SceneResult<()>;

    /// Viewport change notification. Backends without size-dependent state
    /// can ignore it.
    fn resize(&mut self, _viewport: Viewport) -> SceneResult<()> {
        Ok(())
    }
}

/// Discards every frame. Useful when only engine state is under test.
#[derive(Debug, Default)]
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn draw(&mut self, _scene: &Scene) -> SceneResult<()> {
        Ok(())
    }
}

/// Everything the GPU program would receive for one quad in one frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct QuadSnapshot {
    pub id: u32,
    pub position: [f64; 2],
    pub scale: [f64; 2],
    pub time: f32,
    pub corners: [f32; 4],
    pub quad_size: [f32; 2],
    pub texture_size: [f32; 2],
    pub resolution: [f32; 2],
    pub texture: Option<TextureId>,
}

/// One recorded frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FrameSnapshot {
    pub camera: Camera,
    pub quads: Vec<QuadSnapshot>,
}

impl FrameSnapshot {
    fn capture(scene: &Scene) -> Self {
        Self {
            camera: scene.camera,
            quads: scene.quads().iter().map(QuadSnapshot::capture).collect(),
        }
    }
}

impl QuadSnapshot {
    fn capture(quad: &Quad) -> Self {
        let u = &quad.uniforms;
        Self {
            id: quad.id.0,
            position: [quad.position.x, quad.position.y],
            scale: [quad.scale.x, quad.scale.y],
            time: u.time,
            corners: u.corners.to_array(),
            quad_size: [u.quad_size.x, u.quad_size.y],
            texture_size: [u.texture_size.x, u.texture_size.y],
            resolution: [u.resolution.x, u.resolution.y],
            texture: u.texture,
        }
    }
}

/// Captures a [`FrameSnapshot`] per draw, for tests and the CLI.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    frames: Vec<FrameSnapshot>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[FrameSnapshot] {
        &self.frames
    }

    pub fn last(&self) -> Option<&FrameSnapshot> {
        self.frames.last()
    }

    pub fn into_frames(self) -> Vec<FrameSnapshot> {
        self.frames
    }
}

impl RenderBackend for RecordingBackend {
    fn draw(&mut self, scene: &Scene) -> SceneResult<()> {
        self.frames.push(FrameSnapshot::capture(scene));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Vec2, Viewport};
    use crate::uniforms::UniformSet;

    #[test]
    fn recording_backend_captures_quad_state() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        let mut scene = Scene::new(viewport);
        let id = scene.add_quad(UniformSet::template(viewport));
        scene.quad_mut(id).unwrap().position = Vec2::new(-200.0, 175.0);

        let mut backend = RecordingBackend::new();
        backend.draw(&scene).unwrap();
        backend.draw(&scene).unwrap();

        assert_eq!(backend.frames().len(), 2);
        let quad = &backend.last().unwrap().quads[0];
        assert_eq!(quad.position, [-200.0, 175.0]);
        assert_eq!(quad.resolution, [800.0, 600.0]);
    }
}

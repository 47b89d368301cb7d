use std::f64::consts::PI;

use crate::core::{Vec2, Viewport};
use crate::uniforms::UniformSet;

/// Handle to a quad within a [`Scene`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct QuadId(pub u32);

/// Flat textured surface standing in for one tracked page element.
///
/// `position` and `scale` are in world units, which the camera keeps equal
/// to CSS pixels at the z = 0 plane.
#[derive(Clone, Debug)]
pub struct Quad {
    pub id: QuadId,
    pub position: Vec2,
    pub scale: Vec2,
    pub uniforms: UniformSet,
}

/// Perspective camera fixed on the z axis.
///
/// The field of view is derived from the viewport height so one world unit
/// spans exactly one CSS pixel at the z = 0 plane.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct Camera {
    pub position_z: f64,
    pub near: f64,
    pub far: f64,
    pub aspect: f64,
    pub fov_deg: f64,
}

impl Camera {
    pub const DISTANCE: f64 = 600.0;

    pub fn new(viewport: Viewport) -> Self {
        let mut cam = Self {
            position_z: Self::DISTANCE,
            near: 10.0,
            far: 1000.0,
            aspect: 0.0,
            fov_deg: 0.0,
        };
        cam.set_viewport(viewport);
        cam
    }

    /// Recompute aspect and fov for a new viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
        self.fov_deg = 2.0 * ((viewport.height / 2.0) / self.position_z).atan() * 180.0 / PI;
    }
}

/// Owns the quad collection and the base camera. One per page lifetime;
/// page transitions clear and repopulate rather than patch.
#[derive(Clone, Debug)]
pub struct Scene {
    pub camera: Camera,
    quads: Vec<Quad>,
    next_id: u32,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            camera: Camera::new(viewport),
            quads: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add_quad(&mut self, uniforms: UniformSet) -> QuadId {
        let id = QuadId(self.next_id);
        self.next_id += 1;
        self.quads.push(Quad {
            id,
            position: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            uniforms,
        });
        id
    }

    /// Remove every quad. Handles from before the clear no longer resolve.
    pub fn clear_quads(&mut self) {
        self.quads.clear();
    }

    pub fn quad(&self, id: QuadId) -> Option<&Quad> {
        self.quads.iter().find(|q| q.id == id)
    }

    pub fn quad_mut(&mut self, id: QuadId) -> Option<&mut Quad> {
        self.quads.iter_mut().find(|q| q.id == id)
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn quads_mut(&mut self) -> &mut [Quad] {
        &mut self.quads
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

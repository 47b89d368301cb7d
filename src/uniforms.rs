use crate::core::{Vec2f, Vec4f, Viewport};
use crate::texture::TextureId;

/// Stable GPU program parameter names. These are the wire contract with the
/// shader pair in [`crate::shader`]; renaming one is a breaking change.
pub mod names {
    pub const TIME: &str = "time";
    pub const PROGRESS: &str = "uProgress";
    pub const TEXTURE: &str = "uTexture";
    pub const TEXTURE_SIZE: &str = "uTextureSize";
    pub const CORNERS: &str = "uCorners";
    pub const RESOLUTION: &str = "uResolution";
    pub const QUAD_SIZE: &str = "uQuadSize";
}

/// One component of the corner-reveal vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CornerChannel {
    X,
    Y,
    Z,
    W,
}

impl CornerChannel {
    pub const ALL: [Self; 4] = [Self::X, Self::Y, Self::Z, Self::W];
}

impl Vec4f {
    pub fn channel(self, c: CornerChannel) -> f32 {
        match c {
            CornerChannel::X => self.x,
            CornerChannel::Y => self.y,
            CornerChannel::Z => self.z,
            CornerChannel::W => self.w,
        }
    }

    pub fn set_channel(&mut self, c: CornerChannel, v: f32) {
        match c {
            CornerChannel::X => self.x = v,
            CornerChannel::Y => self.y = v,
            CornerChannel::Z => self.z = v,
            CornerChannel::W => self.w = v,
        }
    }
}

/// Per-quad shader parameter bag.
///
/// One template instance lives on the session; every quad clones it at
/// build time and then owns its copy. `progress` is declared for the
/// program but never driven by current interaction logic.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct UniformSet {
    pub time: f32,
    pub progress: f32,
    pub texture: Option<TextureId>,
    pub texture_size: Vec2f,
    pub corners: Vec4f,
    pub resolution: Vec2f,
    pub quad_size: Vec2f,
}

impl UniformSet {
    /// Template values for a fresh scene at the given viewport.
    pub fn template(viewport: Viewport) -> Self {
        Self {
            time: 0.0,
            progress: 0.0,
            texture: None,
            texture_size: Vec2f::new(100.0, 100.0),
            corners: Vec4f::splat(0.0),
            resolution: Vec2f::new(viewport.width as f32, viewport.height as f32),
            quad_size: Vec2f::new(300.0, 300.0),
        }
    }

    /// Clone the template for one quad, attaching its sampler.
    pub fn clone_for(&self, texture: Option<TextureId>) -> Self {
        Self {
            texture,
            ..self.clone()
        }
    }

    pub fn set_resolution(&mut self, viewport: Viewport) {
        self.resolution = Vec2f::new(viewport.width as f32, viewport.height as f32);
    }

    /// All four reveal components at their terminal value.
    pub fn fully_revealed(&self) -> bool {
        self.corners.min_component() >= 1.0
    }

    /// Name/value pairs in the order the GPU program declares them.
    pub fn bindings(&self) -> Vec<(&'static str, UniformValue)> {
        vec![
            (names::TIME, UniformValue::Float(self.time)),
            (names::PROGRESS, UniformValue::Float(self.progress)),
            (names::TEXTURE, UniformValue::Sampler(self.texture)),
            (
                names::TEXTURE_SIZE,
                UniformValue::Vec2([self.texture_size.x, self.texture_size.y]),
            ),
            (names::CORNERS, UniformValue::Vec4(self.corners.to_array())),
            (
                names::RESOLUTION,
                UniformValue::Vec2([self.resolution.x, self.resolution.y]),
            ),
            (
                names::QUAD_SIZE,
                UniformValue::Vec2([self.quad_size.x, self.quad_size.y]),
            ),
        ]
    }
}

/// A uniform value as uploaded to the program.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
    Sampler(Option<TextureId>),
}

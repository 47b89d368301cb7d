use crate::error::{SceneError, SceneResult};

pub use kurbo::{Point, Rect, Vec2};

/// Viewport dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport with strictly positive dimensions.
    pub fn new(width: f64, height: f64) -> SceneResult<Self> {
        if !(width.is_finite() && height.is_finite()) {
            return Err(SceneError::validation("Viewport dimensions must be finite"));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(SceneError::validation("Viewport dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn aspect(self) -> f64 {
        self.width / self.height
    }

    /// Extent along the scroll axis.
    pub fn scroll_extent(self, horizontal: bool) -> f64 {
        if horizontal { self.width } else { self.height }
    }
}

/// 2-component vector as handed to the GPU program.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn aspect(self) -> f32 {
        self.x / self.y
    }
}

impl From<Vec2> for Vec2f {
    fn from(v: Vec2) -> Self {
        Self::new(v.x as f32, v.y as f32)
    }
}

/// 4-component vector as handed to the GPU program.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec4f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4f {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn min_component(self) -> f32 {
        self.x.min(self.y).min(self.z).min(self.w)
    }
}

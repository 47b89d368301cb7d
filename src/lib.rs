#![forbid(unsafe_code)]

pub mod core;
pub mod ease;
pub mod error;
pub mod page;
pub mod pump;
pub mod render;
pub mod reveal;
pub mod scene;
pub mod scroll;
pub mod session;
pub mod shader;
pub mod sync;
pub mod texture;
pub mod timeline;
pub mod transition;
pub mod uniforms;

pub use crate::core::{Vec2f, Vec4f, Viewport};
pub use ease::Ease;
pub use error::{SceneError, SceneResult};
pub use page::{Curtain, Element, Namespace, Page};
pub use pump::{FixedClock, FrameClock, FramePump, RealtimeClock};
pub use render::{FrameSnapshot, NullBackend, RecordingBackend, RenderBackend};
pub use reveal::RetriggerPolicy;
pub use scene::{Camera, Quad, QuadId, Scene};
pub use scroll::{ScrollAdapter, ScrollOptions};
pub use session::{Session, SessionOptions};
pub use transition::TransitionPhase;
pub use uniforms::{CornerChannel, UniformSet};

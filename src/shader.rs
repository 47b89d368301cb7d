//! GPU program sources and their CPU mirrors.
//!
//! The GLSL pair is the wire contract from the uniform names in
//! [`crate::uniforms::names`]. The Rust functions below reproduce the
//! program's placement and UV math exactly, so the blend behavior is
//! testable without a GPU.

use crate::core::{Vec2, Vec2f, Vec4f};

/// Vertex stage: blends each vertex between its default quad placement and
/// a full-screen placement, driven by a bilinear blend of the four corner
/// reveal values.
pub const VERTEX_SOURCE: &str = r#"
precision mediump float;

uniform float time;
uniform float uProgress;
uniform vec2 uResolution;
uniform vec2 uQuadSize;
uniform vec4 uCorners;

varying vec2 vUv;
varying vec2 vSize;

void main() {
    vUv = uv;

    vec4 defaultState = modelMatrix * vec4(position, 1.0);
    vec4 fullScreenState = vec4(position, 1.0);
    fullScreenState.x *= uResolution.x;
    fullScreenState.y *= uResolution.y;

    float cornersProgress = mix(
        mix(uCorners.z, uCorners.w, uv.x),
        mix(uCorners.x, uCorners.y, uv.x),
        uv.y
    );

    vec4 finalState = mix(defaultState, fullScreenState, cornersProgress);
    vSize = mix(uQuadSize, uResolution, cornersProgress);

    gl_Position = projectionMatrix * viewMatrix * finalState;
}
"#;

/// Fragment stage: samples the texture with an aspect-corrected UV remap so
/// the image is never stretched (letterbox/pillarbox).
pub const FRAGMENT_SOURCE: &str = r#"
precision mediump float;

uniform float time;
uniform float uProgress;
uniform vec2 uTextureSize;
uniform sampler2D uTexture;

varying vec2 vUv;
varying vec2 vSize;

vec2 getUV(vec2 uv, vec2 textureSize, vec2 quadSize) {
    vec2 tempUV = uv - vec2(0.5);

    float quadAspect = quadSize.x / quadSize.y;
    float textureAspect = textureSize.x / textureSize.y;
    if (quadAspect < textureAspect) {
        tempUV = tempUV * vec2(quadAspect / textureAspect, 1.0);
    } else {
        tempUV = tempUV * vec2(1.0, textureAspect / quadAspect);
    }

    tempUV += vec2(0.5);
    return tempUV;
}

void main() {
    vec2 correctUV = getUV(vUv, uTextureSize, vSize);
    gl_FragColor = texture2D(uTexture, correctUV);
}
"#;

fn mix32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Bilinear blend of the four corner reveal values at a UV coordinate.
///
/// Matches the vertex stage: `z`/`w` weight the bottom edge, `x`/`y` the
/// top edge, interpolated along `uv.y`.
pub fn corner_progress(uv: Vec2f, corners: Vec4f) -> f32 {
    let bottom = mix32(corners.z, corners.w, uv.x);
    let top = mix32(corners.x, corners.y, uv.x);
    mix32(bottom, top, uv.y)
}

/// Surface size the fragment stage sees at a given corner progress.
pub fn blended_size(quad_size: Vec2f, resolution: Vec2f, progress: f32) -> Vec2f {
    Vec2f::new(
        mix32(quad_size.x, resolution.x, progress),
        mix32(quad_size.y, resolution.y, progress),
    )
}

/// Placement of one unit-quad vertex (`local` in `[-0.5, 0.5]^2`) blended
/// between its default quad placement and the full-screen placement.
pub fn blended_vertex(
    local: Vec2,
    quad_scale: Vec2,
    quad_position: Vec2,
    resolution: Vec2f,
    progress: f32,
) -> Vec2 {
    let default_state = Vec2::new(
        local.x * quad_scale.x + quad_position.x,
        local.y * quad_scale.y + quad_position.y,
    );
    let full_screen = Vec2::new(
        local.x * f64::from(resolution.x),
        local.y * f64::from(resolution.y),
    );
    let t = f64::from(progress);
    Vec2::new(
        default_state.x + (full_screen.x - default_state.x) * t,
        default_state.y + (full_screen.y - default_state.y) * t,
    )
}

/// Aspect-corrected UV remap comparing the texture's aspect with the
/// surface's: the UV is scaled by the smaller aspect ratio term so the
/// sampled image covers the surface without stretching.
pub fn aspect_corrected_uv(uv: Vec2f, texture_size: Vec2f, surface_size: Vec2f) -> Vec2f {
    let mut u = uv.x - 0.5;
    let mut v = uv.y - 0.5;

    let surface_aspect = surface_size.aspect();
    let texture_aspect = texture_size.aspect();
    if surface_aspect < texture_aspect {
        u *= surface_aspect / texture_aspect;
    } else {
        v *= texture_aspect / surface_aspect;
    }

    Vec2f::new(u + 0.5, v + 0.5)
}

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{SceneError, SceneResult};

/// Class marker selecting which elements get a mirrored GPU quad.
pub const IMAGE_MARKER: &str = "js-image";

/// Page template tag selecting which transition choreography applies when
/// this page is the outgoing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Home,
    Inside,
}

impl Namespace {
    /// Home pages scroll horizontally; inside pages scroll vertically.
    pub fn horizontal_scroll(self) -> bool {
        matches!(self, Self::Home)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Inside => write!(f, "inside"),
        }
    }
}

/// Axis-aligned element bounds in CSS pixels, `getBoundingClientRect` shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    fn shifted(self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..self
        }
    }

    fn validate(&self) -> SceneResult<()> {
        let vals = [self.left, self.top, self.width, self.height];
        if vals.iter().any(|v| !v.is_finite()) {
            return Err(SceneError::validation("element bounds must be finite"));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(SceneError::validation(
                "element bounds must have non-negative size",
            ));
        }
        Ok(())
    }
}

/// One DOM-like element of a page: identity, class list, layout-space
/// bounds, and an optional bitmap source for texturing.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Bounds in layout (document) space, before any scroll offset.
    pub bounds: Bounds,
    #[serde(default)]
    pub source: Option<String>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Bounds as seen from the viewport at the given scroll position.
    pub fn client_bounds(&self, scroll_pos: f64, horizontal: bool) -> Bounds {
        if horizontal {
            self.bounds.shifted(-scroll_pos, 0.0)
        } else {
            self.bounds.shifted(0.0, -scroll_pos)
        }
    }
}

/// In-memory stand-in for one page of DOM content.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Page {
    pub namespace: Namespace,
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Total scrollable content length along the page's scroll axis.
    pub scroll_length: f64,
    /// Whether the page carries a scroll container the adapter can attach to.
    #[serde(default = "default_true")]
    pub has_scroll_container: bool,
    /// Content opacity, animated during transitions.
    #[serde(default = "default_opacity", skip_serializing_if = "is_one")]
    pub opacity: f64,
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

fn is_one(v: &f64) -> bool {
    *v == 1.0
}

impl Page {
    /// Elements carrying the trackable-image marker class, in page order.
    pub fn trackable(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.has_class(IMAGE_MARKER))
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !self.scroll_length.is_finite() || self.scroll_length < 0.0 {
            return Err(SceneError::validation(
                "Page scroll_length must be finite and >= 0",
            ));
        }
        let mut seen = BTreeSet::new();
        for el in &self.elements {
            if el.id.trim().is_empty() {
                return Err(SceneError::validation("element ids must be non-empty"));
            }
            if !seen.insert(el.id.as_str()) {
                return Err(SceneError::validation(format!(
                    "duplicate element id '{}'",
                    el.id
                )));
            }
            el.bounds.validate()?;
        }
        Ok(())
    }
}

/// Full-viewport overlay masking content swaps during inside-page
/// transitions. `y` is a percent translate: -100 parked above the viewport,
/// 0 fully covering it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curtain {
    pub y: f64,
}

impl Curtain {
    pub const HIDDEN_Y: f64 = -100.0;
    pub const COVERING_Y: f64 = 0.0;

    pub fn covers_viewport(self) -> bool {
        self.y >= Self::COVERING_Y
    }
}

impl Default for Curtain {
    fn default() -> Self {
        Self { y: Self::HIDDEN_Y }
    }
}

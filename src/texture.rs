use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::error::SceneResult;

/// Handle to an uploaded texture.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TextureId(pub u32);

/// Decoded RGBA8 bitmap ready for sampling.
#[derive(Clone, Debug)]
pub struct Texture {
    pub id: TextureId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major RGBA8.
    pub rgba8: Arc<Vec<u8>>,
}

impl Texture {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Uploads bitmap sources once and hands out stable handles.
///
/// Sources are keyed by their page-model string; re-uploading the same
/// source returns the existing handle.
#[derive(Debug, Default)]
pub struct TextureStore {
    root: PathBuf,
    by_source: BTreeMap<String, TextureId>,
    textures: Vec<Texture>,
}

impl TextureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            by_source: BTreeMap::new(),
            textures: Vec::new(),
        }
    }

    /// Decode a bitmap source from disk and upload it.
    pub fn load_source(&mut self, source: &str) -> SceneResult<TextureId> {
        if let Some(&id) = self.by_source.get(source) {
            return Ok(id);
        }
        let path = self.root.join(Path::new(source));
        let bytes =
            std::fs::read(&path).with_context(|| format!("read texture '{}'", path.display()))?;
        let dyn_img = image::load_from_memory(&bytes)
            .with_context(|| format!("decode texture '{source}'"))?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(self.insert(source, width, height, rgba.into_raw()))
    }

    /// Upload an already-decoded RGBA8 bitmap under a source key.
    pub fn insert_rgba(
        &mut self,
        source: &str,
        width: u32,
        height: u32,
        rgba8: Vec<u8>,
    ) -> TextureId {
        if let Some(&id) = self.by_source.get(source) {
            return id;
        }
        self.insert(source, width, height, rgba8)
    }

    fn insert(&mut self, source: &str, width: u32, height: u32, rgba8: Vec<u8>) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(Texture {
            id,
            width,
            height,
            rgba8: Arc::new(rgba8),
        });
        self.by_source.insert(source.to_string(), id);
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

//! Static asset loading

use crate::AssetLoadError;
use async_trait::async_trait;
use pdf_core::ImageXObject;
use std::path::Path;
use std::sync::Arc;

/// A fully decoded image ready to be placed on any number of pages
#[derive(Debug, Clone)]
pub struct EmbeddableImage {
    inner: Arc<ImageXObject>,
}

impl EmbeddableImage {
    pub fn new(xobject: ImageXObject) -> Self {
        Self {
            inner: Arc::new(xobject),
        }
    }

    /// Decode JPEG or PNG bytes
    pub fn decode(data: &[u8]) -> pdf_core::Result<Self> {
        ImageXObject::decode(data).map(Self::new)
    }

    /// Pixel dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    pub fn xobject(&self) -> &ImageXObject {
        &self.inner
    }
}

/// Loads static images such as the company logo
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Load and fully decode the image at `path`
    async fn load_image(&self, path: &Path) -> Result<EmbeddableImage, AssetLoadError>;
}

/// Reads assets from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FsAssetLoader;

#[async_trait]
impl AssetLoader for FsAssetLoader {
    async fn load_image(&self, path: &Path) -> Result<EmbeddableImage, AssetLoadError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| AssetLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        EmbeddableImage::decode(&data).map_err(|e| AssetLoadError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

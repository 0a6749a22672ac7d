use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::{decode::decode_image, image::ImageResource},
    foundation::error::{StampError, StampResult},
};

/// Completes [`ImageResource`]s from files under a root directory.
#[derive(Clone, Debug)]
pub struct AssetLoader {
    root: PathBuf,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read and decode the image's source, then complete it.
    ///
    /// On failure the resource is marked failed and stays undrawable.
    #[tracing::instrument(skip(self, image), fields(src = ?image.src()))]
    pub fn load(&self, image: &ImageResource) -> StampResult<()> {
        let Some(src) = image.src() else {
            return Err(StampError::asset("image has no source to load"));
        };
        match self.read_bytes(&src).and_then(|bytes| decode_image(&bytes)) {
            Ok(bitmap) => {
                tracing::debug!(width = bitmap.width, height = bitmap.height, "image ready");
                image.complete(bitmap);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "image failed to load");
                image.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Decode in-memory bytes into `image`.
    pub fn load_bytes(&self, image: &ImageResource, bytes: &[u8]) -> StampResult<()> {
        match decode_image(bytes) {
            Ok(bitmap) => {
                image.complete(bitmap);
                Ok(())
            }
            Err(err) => {
                image.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Load every resource that has a source and is not complete yet.
    ///
    /// All images are attempted; the first error is returned.
    pub fn load_pending<'a>(
        &self,
        images: impl IntoIterator<Item = &'a ImageResource>,
    ) -> StampResult<()> {
        let mut first_err = None;
        for image in images {
            if image.is_complete() || image.src().is_none() {
                continue;
            }
            if let Err(err) = self.load(image) {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn read_bytes(&self, src: &str) -> StampResult<Vec<u8>> {
        let path = self.root.join(Path::new(src));
        std::fs::read(&path)
            .with_context(|| format!("read image bytes from '{}'", path.display()))
            .map_err(StampError::from)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;

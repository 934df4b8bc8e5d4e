// framiq/src/processors/loader.rs
use crate::core::{Dimensions, FramiqError, Result};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    /// Decode a file. Every failure, including a zero-sized or oversized
    /// image, is reported as [`FramiqError::Decode`].
    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let image = ImageReader::open(path)
            .map_err(|e| FramiqError::decode(path, e))?
            .with_guessed_format()
            .map_err(|e| FramiqError::decode(path, e))?
            .decode()
            .map_err(|e| FramiqError::decode(path, e))?;

        let (width, height) = image.dimensions();
        self.validate_dimensions(path, width, height)?;

        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    /// Read dimensions from the header without decoding pixels.
    pub fn identify(&self, path: &Path) -> Result<Dimensions> {
        let (width, height) = ImageReader::open(path)
            .map_err(|e| FramiqError::decode(path, e))?
            .with_guessed_format()
            .map_err(|e| FramiqError::decode(path, e))?
            .into_dimensions()
            .map_err(|e| FramiqError::decode(path, e))?;

        self.validate_dimensions(path, width, height)?;

        Ok(Dimensions::from_pixels(width, height))
    }

    fn validate_dimensions(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(FramiqError::decode(path, "image has zero width or height"));
        }

        if let Some((max_w, max_h)) = self.max_dimensions {
            if width > max_w || height > max_h {
                return Err(FramiqError::decode(
                    path,
                    format!(
                        "dimensions {}x{} exceed maximum {}x{}",
                        width, height, max_w, max_h
                    ),
                ));
            }
        }

        Ok(())
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path
            .metadata()
            .map_err(|e| FramiqError::decode(path, e))?;

        if metadata.len() == 0 {
            return Err(FramiqError::decode(path, "file is empty"));
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_and_identifies_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        image::RgbImage::new(40, 30).save(&path).unwrap();

        let loader = Loader::new();
        assert_eq!(loader.load(&path).unwrap().dimensions(), (40, 30));
        assert_eq!(loader.identify(&path).unwrap(), Dimensions::new(40.0, 30.0));
    }

    #[test]
    fn corrupt_and_empty_files_are_decode_errors() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("corrupt.jpg");
        let empty = dir.path().join("empty.png");
        fs::write(&corrupt, b"definitely not a jpeg").unwrap();
        fs::write(&empty, b"").unwrap();

        let loader = Loader::new();
        assert!(matches!(loader.load(&corrupt), Err(FramiqError::Decode { .. })));
        assert!(matches!(loader.load(&empty), Err(FramiqError::Decode { .. })));
        assert!(matches!(
            loader.load(&dir.path().join("missing.png")),
            Err(FramiqError::Decode { .. })
        ));
    }

    #[test]
    fn oversized_images_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        image::RgbImage::new(64, 8).save(&path).unwrap();

        let loader = Loader::new().with_max_dimensions(32, 32);
        assert!(matches!(loader.load(&path), Err(FramiqError::Decode { .. })));
    }
}

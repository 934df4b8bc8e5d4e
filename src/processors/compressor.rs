// framiq/src/processors/compressor.rs
use crate::core::{FramiqError, OutputFormat, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use oxipng::{optimize_from_memory, Options};
use std::io::Cursor;
use std::path::Path;

pub struct Compressor {
    quality: u8,
    optimize_png: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            optimize_png: false,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn compress_to_bytes(&self, image: &RgbImage, format: OutputFormat) -> Result<Vec<u8>> {
        log::debug!(
            "Encoding {}x{} image as {:?}, quality: {}",
            image.width(),
            image.height(),
            format,
            self.quality
        );

        let mut buffer = Cursor::new(Vec::new());

        match format {
            OutputFormat::Jpeg => {
                let mut encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
                encoder.encode_image(image)?;
            }
            OutputFormat::Png => {
                image.write_to(&mut buffer, ImageFormat::Png)?;
                if self.optimize_png {
                    return self.optimize_png_bytes(&buffer.into_inner());
                }
            }
            OutputFormat::Tiff => image.write_to(&mut buffer, ImageFormat::Tiff)?,
            OutputFormat::Bmp => image.write_to(&mut buffer, ImageFormat::Bmp)?,
            OutputFormat::Gif => image.write_to(&mut buffer, ImageFormat::Gif)?,
        }

        Ok(buffer.into_inner())
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        optimize_from_memory(data, &Options::default())
            .map_err(|e| FramiqError::ProcessingError(format!("PNG optimization failed: {}", e)))
    }

    /// Write encoded bytes, replacing any existing file.
    pub fn write(&self, data: &[u8], path: &Path) -> Result<()> {
        std::fs::write(path, data).map_err(|e| FramiqError::write(path, e))?;
        log::info!("Saved image: {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample() -> RgbImage {
        RgbImage::from_pixel(16, 12, Rgb([200, 100, 50]))
    }

    #[test]
    fn encodes_each_format_readably() {
        let compressor = Compressor::new(90);
        let cases = [
            (OutputFormat::Jpeg, ImageFormat::Jpeg),
            (OutputFormat::Png, ImageFormat::Png),
            (OutputFormat::Tiff, ImageFormat::Tiff),
            (OutputFormat::Bmp, ImageFormat::Bmp),
            (OutputFormat::Gif, ImageFormat::Gif),
        ];

        for (format, expected) in cases {
            let bytes = compressor.compress_to_bytes(&sample(), format).unwrap();
            assert_eq!(image::guess_format(&bytes).unwrap(), expected);

            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (16, 12));
        }
    }

    #[test]
    fn optimized_png_still_decodes() {
        let bytes = Compressor::new(90)
            .with_png_optimization(true)
            .compress_to_bytes(&sample(), OutputFormat::Png)
            .unwrap();

        assert_eq!(image::load_from_memory(&bytes).unwrap().width(), 16);
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        std::fs::write(&path, b"old").unwrap();

        Compressor::new(90).write(b"new", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn write_into_missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.jpg");

        let result = Compressor::new(90).write(b"data", &path);
        assert!(matches!(result, Err(FramiqError::Write { .. })));
    }
}

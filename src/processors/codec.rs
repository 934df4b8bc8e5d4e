// framiq/src/processors/codec.rs
//! Image codec boundary.
//!
//! The pipeline only talks to [`ImageCodec`]; [`ImageCrateCodec`] is the
//! production implementation on top of the `image` crate. Tests swap in a
//! mock to script decode failures and cancellation.

use super::{Compositor, Compressor, Loader};
use crate::core::{Dimensions, Layout, OutputFormat, ProcessConfig, Result};
use image::DynamicImage;
use std::path::Path;

pub trait ImageCodec: Sync {
    /// Decoded pixel data, opaque to the pipeline.
    type Raster: Send;

    /// Decode a file. Unreadable, corrupt, unsupported or zero-sized images
    /// fail with `FramiqError::Decode`.
    fn decode(&self, path: &Path) -> Result<(Dimensions, Self::Raster)>;

    /// Scale the raster to the layout's placed size, center it on a white
    /// canvas of the final size and encode it.
    fn encode(&self, raster: &Self::Raster, layout: &Layout, format: OutputFormat)
        -> Result<Vec<u8>>;

    /// Write encoded bytes. Fails with `FramiqError::Write`.
    fn write(&self, bytes: &[u8], path: &Path) -> Result<()>;
}

pub struct ImageCrateCodec {
    loader: Loader,
    compositor: Compositor,
    compressor: Compressor,
}

impl ImageCrateCodec {
    pub fn new(config: &ProcessConfig) -> Self {
        Self {
            loader: Loader::new(),
            compositor: Compositor::new(config.algorithm),
            compressor: Compressor::new(config.quality).with_png_optimization(config.optimize_png),
        }
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self::new(&ProcessConfig::default())
    }
}

impl ImageCodec for ImageCrateCodec {
    type Raster = DynamicImage;

    fn decode(&self, path: &Path) -> Result<(Dimensions, DynamicImage)> {
        let image = self.loader.load(path)?;
        Ok((Dimensions::from_pixels(image.width(), image.height()), image))
    }

    fn encode(
        &self,
        raster: &DynamicImage,
        layout: &Layout,
        format: OutputFormat,
    ) -> Result<Vec<u8>> {
        let composed = self.compositor.compose(raster, layout);
        self.compressor.compress_to_bytes(&composed, format)
    }

    fn write(&self, bytes: &[u8], path: &Path) -> Result<()> {
        self.compressor.write(bytes, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn frames_through_the_image_crate() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("wide.png");
        let output = dir.path().join("wide_framiq.png");
        RgbImage::from_pixel(40, 20, Rgb([0, 0, 0])).save(&input).unwrap();

        let codec = ImageCrateCodec::default();
        assert_eq!(codec.loader().identify(&input).unwrap(), Dimensions::new(40.0, 20.0));

        let (dimensions, raster) = codec.decode(&input).unwrap();
        let layout = crate::core::compute_layout(
            dimensions,
            crate::core::AspectRatioSpec::new(1.0, 1.0).unwrap(),
            crate::core::BorderPercent::new(0.0).unwrap(),
        );
        let bytes = codec.encode(&raster, &layout, OutputFormat::Png).unwrap();
        codec.write(&bytes, &output).unwrap();

        let framed = image::open(&output).unwrap();
        assert_eq!((framed.width(), framed.height()), (40, 40));
    }
}

// framiq/src/processors/compositor.rs
use crate::core::{Layout, ResizeAlgorithm};
use image::{imageops, imageops::FilterType, DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Scales an image to its placed size and centers it on a white canvas.
pub struct Compositor {
    algorithm: ResizeAlgorithm,
}

impl Compositor {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn compose(&self, image: &DynamicImage, layout: &Layout) -> RgbImage {
        let geometry = layout.pixel_geometry();

        let resized = self.resize_exact(image, geometry.placed_width, geometry.placed_height);

        let mut canvas =
            RgbaImage::from_pixel(geometry.canvas_width, geometry.canvas_height, BACKGROUND);
        // Alpha blends onto the white background.
        imageops::overlay(
            &mut canvas,
            &resized.to_rgba8(),
            geometry.x as i64,
            geometry.y as i64,
        );

        log::debug!(
            "Composed {}x{} image at ({}, {}) on {}x{} canvas",
            geometry.placed_width,
            geometry.placed_height,
            geometry.x,
            geometry.y,
            geometry.canvas_width,
            geometry.canvas_height
        );

        flatten(canvas)
    }

    pub fn resize_exact(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        if width == image.width() && height == image.height() {
            log::debug!("Image dimensions unchanged, skipping resize");
            return image.clone();
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        image.resize_exact(width, height, self.get_filter_type())
    }

    fn get_filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

fn flatten(canvas: RgbaImage) -> RgbImage {
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let [r, g, b, _] = canvas.get_pixel(x, y).0;
        Rgb([r, g, b])
    })
}

// framiq/src/core/geometry.rs
//! Canvas geometry.
//!
//! All functions here are pure: no state, no I/O. Inputs are assumed to be
//! validated upstream (positive, finite dimensions); the loader rejects
//! zero-sized images before they reach this module.

use super::{AspectRatioSpec, BorderPercent, Dimensions};

/// Result of fitting one image onto a canvas of the target shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Canvas before the border, sized from the image's longest side.
    pub canvas_size: Dimensions,
    /// Canvas grown by the border percentage; the output image size.
    pub final_canvas_size: Dimensions,
    /// Scaled image size, fitted inside `canvas_size`.
    pub placed_image_size: Dimensions,
}

impl Layout {
    /// Top-left position of the placed image, centered on the final canvas.
    pub fn offset(&self) -> (f64, f64) {
        (
            (self.final_canvas_size.width - self.placed_image_size.width) / 2.0,
            (self.final_canvas_size.height - self.placed_image_size.height) / 2.0,
        )
    }

    /// Pixel geometry used by the compositor: final canvas size, placed
    /// image size and offset, all rounded and clamped to fit the canvas.
    pub fn pixel_geometry(&self) -> PixelGeometry {
        let (canvas_width, canvas_height) = self.final_canvas_size.to_pixels();
        let (placed_width, placed_height) = self.placed_image_size.to_pixels();
        let placed_width = placed_width.min(canvas_width);
        let placed_height = placed_height.min(canvas_height);

        PixelGeometry {
            canvas_width,
            canvas_height,
            placed_width,
            placed_height,
            x: (canvas_width - placed_width) / 2,
            y: (canvas_height - placed_height) / 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelGeometry {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub placed_width: u32,
    pub placed_height: u32,
    pub x: u32,
    pub y: u32,
}

/// Compute canvas, bordered canvas and placed image size.
///
/// The canvas is anchored to the image's longest side whatever the image's
/// own orientation, so output resolution follows input resolution. A
/// landscape target keeps that side as the canvas width, a portrait or
/// square target keeps it as the canvas height.
///
/// # Examples
/// ```
/// # use framiq::{compute_layout, AspectRatioSpec, BorderPercent, Dimensions};
/// let layout = compute_layout(
///     Dimensions::new(4000.0, 3000.0),
///     AspectRatioSpec::new(1.0, 1.0).unwrap(),
///     BorderPercent::new(0.0).unwrap(),
/// );
/// assert_eq!(layout.canvas_size, Dimensions::new(4000.0, 4000.0));
/// assert_eq!(layout.placed_image_size.width, 4000.0);
/// ```
pub fn compute_layout(
    image: Dimensions,
    target: AspectRatioSpec,
    border: BorderPercent,
) -> Layout {
    let longest_side = image.width.max(image.height);
    let target_ratio = target.ratio();

    let canvas_size = if target_ratio > 1.0 {
        Dimensions::new(longest_side, longest_side / target_ratio)
    } else {
        Dimensions::new(longest_side * target_ratio, longest_side)
    };

    let final_canvas_size = canvas_size.scaled(border.scale_factor());
    let placed_image_size = fit_within(image, canvas_size);

    Layout {
        canvas_size,
        final_canvas_size,
        placed_image_size,
    }
}

/// Largest size with the image's aspect ratio that fits inside `bounds`.
pub fn fit_within(image: Dimensions, bounds: Dimensions) -> Dimensions {
    let image_ratio = image.ratio();

    if image_ratio > bounds.ratio() {
        Dimensions::new(bounds.width, bounds.width / image_ratio)
    } else {
        Dimensions::new(bounds.height * image_ratio, bounds.height)
    }
}

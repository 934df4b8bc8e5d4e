// framiq/src/core/aspect.rs
//! Aspect-ratio presets and clustering of a batch of images by shape.

use super::{AspectRatioSpec, Dimensions};
use std::collections::HashMap;

/// Maximum distance between a ratio and a preset for the two to match.
pub const PRESET_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectPreset {
    pub width: f64,
    pub height: f64,
    /// Short name accepted on the command line.
    pub alias: &'static str,
    pub label: &'static str,
}

impl AspectPreset {
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn spec(&self) -> AspectRatioSpec {
        AspectRatioSpec {
            width: self.width,
            height: self.height,
        }
    }
}

const fn preset(width: f64, height: f64, alias: &'static str, label: &'static str) -> AspectPreset {
    AspectPreset {
        width,
        height,
        alias,
        label,
    }
}

pub const PRESETS: [AspectPreset; 8] = [
    preset(1.0, 1.0, "square", "Square 1:1"),
    preset(3.0, 2.0, "classic", "Landscape 3:2"),
    preset(4.0, 3.0, "standard", "Landscape 4:3"),
    preset(16.0, 9.0, "widescreen", "Widescreen 16:9"),
    preset(2.0, 3.0, "classic-portrait", "Portrait 2:3"),
    preset(3.0, 4.0, "standard-portrait", "Portrait 3:4"),
    preset(4.0, 5.0, "instagram", "Portrait 4:5"),
    preset(9.0, 16.0, "story", "Story 9:16"),
];

/// One image as seen by the clusterer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    pub file_name: String,
    pub dimensions: Dimensions,
}

impl ImageSample {
    pub fn new(file_name: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            file_name: file_name.into(),
            dimensions,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedAspectRatioGroup {
    pub representative_ratio: AspectRatioSpec,
    pub member_count: usize,
    /// First file seen with this ratio.
    pub sample_file_name: String,
}

impl DetectedAspectRatioGroup {
    pub fn display_name(&self) -> String {
        self.representative_ratio.display_name()
    }
}

fn nearest_preset(ratio: f64) -> (&'static AspectPreset, f64) {
    let mut best = &PRESETS[0];
    let mut best_distance = f64::INFINITY;

    for preset in PRESETS.iter() {
        let distance = (ratio - preset.ratio()).abs();
        if distance < best_distance {
            best = preset;
            best_distance = distance;
        }
    }

    (best, best_distance)
}

/// Snap a ratio to the closest preset, or to a coarse reduced fraction of
/// `round(ratio * 100) : 100` when no preset is within tolerance.
///
/// Ratios below 0.005 round to zero, which reduces to `0:1` since
/// `gcd(0, 100) == 100`. Extremely narrow images therefore group under a
/// zero-width ratio rather than a tiny fraction.
pub fn round_to_common_ratio(ratio: f64) -> AspectRatioSpec {
    let (preset, distance) = nearest_preset(ratio);
    if distance <= PRESET_TOLERANCE {
        return preset.spec();
    }

    let scaled = (ratio * 100.0).round().max(0.0) as u64;
    let divisor = gcd(scaled, 100);

    AspectRatioSpec {
        width: (scaled / divisor) as f64,
        height: (100 / divisor) as f64,
    }
}

/// Greatest common divisor. `gcd(0, n) == n`; `gcd(0, 0)` is 1 so callers
/// can always divide by the result.
pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}

/// Human-readable label for a ratio: a preset label when one is within
/// tolerance, otherwise `Landscape 2.4:1` / `Portrait 0.3:1`.
pub fn display_name(ratio: f64) -> String {
    let (preset, distance) = nearest_preset(ratio);
    if distance <= PRESET_TOLERANCE {
        return preset.label.to_string();
    }

    if ratio > 1.0 {
        format!("Landscape {:.1}:1", ratio)
    } else {
        format!("Portrait {:.1}:1", ratio)
    }
}

/// Group images by their rounded ratio, largest group first.
///
/// Groups are keyed by the formatted `width:height` pair, so ratios that
/// round to the same displayed pair merge. Groups with equal counts keep
/// first-seen order; callers should not rely on it.
pub fn detect(samples: &[ImageSample]) -> Vec<DetectedAspectRatioGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DetectedAspectRatioGroup> = Vec::new();

    for sample in samples {
        let rounded = round_to_common_ratio(sample.dimensions.ratio());
        let key = rounded.to_string();

        match index.get(&key) {
            Some(&i) => groups[i].member_count += 1,
            None => {
                index.insert(key, groups.len());
                groups.push(DetectedAspectRatioGroup {
                    representative_ratio: rounded,
                    member_count: 1,
                    sample_file_name: sample.file_name.clone(),
                });
            }
        }
    }

    groups.sort_by(|a, b| b.member_count.cmp(&a.member_count));

    log::debug!(
        "Detected {} aspect ratio group(s) from {} image(s)",
        groups.len(),
        samples.len()
    );

    groups
}

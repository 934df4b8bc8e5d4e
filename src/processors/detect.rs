// framiq/src/processors/detect.rs
use crate::core::aspect::{self, DetectedAspectRatioGroup, ImageSample};
use crate::core::Result;
use crate::processors::Loader;
use crate::utils::{file_name_of, list_supported_files};
use std::path::Path;

/// Cluster the supported images of `dir` by aspect ratio. Only headers are
/// read; files whose dimensions cannot be read are left out.
pub fn detect_in_directory(dir: &Path, loader: &Loader) -> Result<Vec<DetectedAspectRatioGroup>> {
    let samples: Vec<ImageSample> = list_supported_files(dir)?
        .iter()
        .filter_map(|path| match loader.identify(path) {
            Ok(dimensions) => Some(ImageSample::new(file_name_of(path).ok()?, dimensions)),
            Err(e) => {
                log::debug!("Not counting {}: {}", path.display(), e);
                None
            }
        })
        .collect();

    Ok(aspect::detect(&samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    #[test]
    fn clusters_readable_images() {
        let dir = TempDir::new().unwrap();
        image::RgbImage::new(160, 90).save(dir.child("wide1.png").path()).unwrap();
        image::RgbImage::new(320, 180).save(dir.child("wide2.png").path()).unwrap();
        image::RgbImage::new(50, 50).save(dir.child("square.png").path()).unwrap();
        dir.child("broken.jpg").write_binary(b"nope").unwrap();
        dir.child("notes.txt").write_str("ignored").unwrap();

        let groups = detect_in_directory(dir.path(), &Loader::new()).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].member_count, 2);
        assert_eq!(groups[0].display_name(), "Widescreen 16:9");
        assert_eq!(groups[1].member_count, 1);
        assert_eq!(groups[1].sample_file_name, "square.png");
    }
}

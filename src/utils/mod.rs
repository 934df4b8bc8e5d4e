// framiq/src/utils/mod.rs
use crate::core::{FramiqError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Input extensions accepted by the batch scan, compared case-insensitively.
/// HEIC/HEIF pass the filter but only decode when the codec supports them.
pub const SUPPORTED_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "tiff", "tif", "bmp", "gif", "heic", "heif",
];

pub const SINGLE_OUTPUT_SUFFIX: &str = "_framiq";

/// `photo.JPG` -> `photo_framiq.JPG`. Splits at the last '.', so
/// `a.b.png` becomes `a.b_framiq.png`; a name without a dot gets the bare suffix.
pub fn single_output_name(input_file_name: &str) -> String {
    match input_file_name.rfind('.') {
        Some(dot) if dot > 0 => {
            let (stem, ext) = input_file_name.split_at(dot);
            format!("{}{}{}", stem, SINGLE_OUTPUT_SUFFIX, ext)
        }
        _ => format!("{}{}", input_file_name, SINGLE_OUTPUT_SUFFIX),
    }
}

/// Batch outputs keep the input name; only the directory changes.
pub fn batch_output_name(input_file_name: &str) -> String {
    input_file_name.to_string()
}

/// Output path for single-image mode: next to the input.
pub fn single_output_path(input_path: &Path) -> Result<PathBuf> {
    let name = file_name_of(input_path)?;
    Ok(input_path.with_file_name(single_output_name(&name)))
}

/// Output path for batch mode: same name inside `output_dir`. An existing
/// file there is overwritten.
pub fn batch_output_path(output_dir: &Path, input_file_name: &str) -> PathBuf {
    output_dir.join(batch_output_name(input_file_name))
}

pub fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            FramiqError::InvalidParameter(format!("Invalid file name: {}", path.display()))
        })
}

pub fn is_supported_format(path: &Path) -> bool {
    get_file_extension(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

/// Regular, non-hidden files directly inside `dir` with a supported
/// extension, in directory enumeration order.
///
/// Fails if `dir` itself cannot be read; unreadable entries are skipped.
pub fn list_supported_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(FramiqError::Io(e.into())),
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_hidden(path) || !is_supported_format(path) {
            continue;
        }

        paths.push(entry.into_path());
    }

    Ok(paths)
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn single_output_name_keeps_extension_case() {
        assert_eq!(single_output_name("photo.JPG"), "photo_framiq.JPG");
        assert_eq!(single_output_name("photo.jpg"), "photo_framiq.jpg");
        assert_eq!(single_output_name("my.trip.png"), "my.trip_framiq.png");
        assert_eq!(single_output_name("README"), "README_framiq");
    }

    #[test]
    fn batch_output_name_is_unchanged() {
        assert_eq!(batch_output_name("IMG_0001.HEIC"), "IMG_0001.HEIC");
        assert_eq!(
            batch_output_path(Path::new("/out"), "a.png"),
            PathBuf::from("/out/a.png")
        );
    }

    #[test]
    fn single_output_path_stays_next_to_input() {
        let path = single_output_path(Path::new("/photos/trip/photo.JPG")).unwrap();
        assert_eq!(path, PathBuf::from("/photos/trip/photo_framiq.JPG"));
    }

    #[test]
    fn supported_formats_are_case_insensitive() {
        assert!(is_supported_format(Path::new("a.JPG")));
        assert!(is_supported_format(Path::new("a.HeIc")));
        assert!(is_supported_format(Path::new("a.tif")));
        assert!(!is_supported_format(Path::new("a.webp")));
        assert!(!is_supported_format(Path::new("a.txt")));
        assert!(!is_supported_format(Path::new("jpg")));
    }

    #[test]
    fn listing_filters_hidden_unsupported_and_nested() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.jpg", "b.PNG", "c.tiff", ".hidden.jpg", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();
        fs::write(dir.path().join("nested.jpg").join("d.jpg"), b"x").unwrap();

        let mut names: Vec<String> = list_supported_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name_of(p).unwrap())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.tiff"]);
    }

    #[test]
    fn listing_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_supported_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn file_sizes_are_human_readable() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
    }
}

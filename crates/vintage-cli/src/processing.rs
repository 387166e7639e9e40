//! Output paths and result formatting.

use std::path::{Path, PathBuf};

use vintage_core::benchmark::ImageSize;
use vintage_core::Backend;

/// Suffix appended to the input stem for processed images.
pub const OUTPUT_SUFFIX: &str = "_vintage";

/// Determine the output path for a processed image.
///
/// `out` may be a directory (the file is named `<stem>_vintage.png` inside it)
/// or a full file path used as-is. Without `out` the file lands next to the
/// input.
pub fn determine_output_path(input: &Path, out: &Option<PathBuf>) -> Result<PathBuf, String> {
    let stem = input
        .file_stem()
        .ok_or("Invalid input filename")?
        .to_string_lossy();
    let filename = format!("{}{}.png", stem, OUTPUT_SUFFIX);

    match out {
        Some(out_path) if out_path.is_dir() => Ok(out_path.join(filename)),
        Some(out_path) => Ok(out_path.clone()),
        None => {
            let parent = input.parent().unwrap_or(Path::new("."));
            Ok(parent.join(filename))
        }
    }
}

/// One-line summary of a processing run, e.g.
/// `native - 8 threads, 50% intensity: 12ms`.
pub fn format_run_line(
    backend: Backend,
    threads: usize,
    intensity: f32,
    elapsed_ms: u128,
) -> String {
    format!(
        "{} - {} threads, {}% intensity: {}ms",
        backend,
        threads,
        (intensity * 100.0).round() as u32,
        elapsed_ms
    )
}

/// The size with the most pixels, used for the synthetic benchmark source.
pub fn largest_size(sizes: &[ImageSize]) -> Option<ImageSize> {
    sizes
        .iter()
        .copied()
        .max_by_key(|size| size.width as u64 * size.height as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_next_to_input() {
        let path = determine_output_path(Path::new("/photos/cat.jpg.png"), &None).unwrap();
        assert_eq!(path, PathBuf::from("/photos/cat.jpg_vintage.png"));
    }

    #[test]
    fn test_output_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = Some(dir.path().to_path_buf());
        let path = determine_output_path(Path::new("scan.tif"), &out).unwrap();
        assert_eq!(path, dir.path().join("scan_vintage.png"));
    }

    #[test]
    fn test_output_explicit_file() {
        let out = Some(PathBuf::from("/tmp/does-not-exist/result.tif"));
        let path = determine_output_path(Path::new("scan.tif"), &out).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/does-not-exist/result.tif"));
    }

    #[test]
    fn test_format_run_line() {
        assert_eq!(
            format_run_line(Backend::Native, 8, 0.5, 12),
            "native - 8 threads, 50% intensity: 12ms"
        );
        assert_eq!(
            format_run_line(Backend::Managed, 1, 0.333, 0),
            "managed - 1 threads, 33% intensity: 0ms"
        );
    }

    #[test]
    fn test_largest_size() {
        let sizes = [
            ImageSize::new(800, 600),
            ImageSize::new(3840, 2160),
            ImageSize::new(1920, 1080),
        ];
        assert_eq!(largest_size(&sizes), Some(ImageSize::new(3840, 2160)));
        assert_eq!(largest_size(&[]), None);
    }
}

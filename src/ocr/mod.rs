//! Screen scanning
//!
//! Turns one screenshot of Relay's filter screen into an ordered,
//! deduplicated list of candidate subreddit names: crop to the list band,
//! recognize text, split into trimmed lines. Recognition is an opaque
//! collaborator behind [`TextRecognizer`]; the production implementation
//! shells out to the tesseract executable.

use crate::domain::{Result, SyncError};
use image::{DynamicImage, GenericImageView};
use std::path::Path;
use std::process::Command;

/// Vertical fraction of the screenshot to scan.
///
/// The band between `top` and `bottom` (fractions of image height) holds the
/// filter list itself; the title bar above and navigation chrome below are
/// known OCR noise sources for this layout.
#[derive(Debug, Clone, Copy)]
pub struct CropBand {
    pub top: f64,
    pub bottom: f64,
}

/// Image-to-text collaborator. Synchronous, possibly slow, possibly wrong.
pub trait TextRecognizer {
    fn recognize_text(&self, image: &Path) -> Result<String>;
}

/// Recognizer that runs the tesseract CLI with stdout output.
pub struct TesseractCli {
    program: String,
}

impl TesseractCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize_text(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(image)
            .arg("stdout")
            .output()
            .map_err(|e| SyncError::Recognition(format!("failed to spawn {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SyncError::Recognition(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Scan one screenshot for subreddit names.
///
/// Failures (unreadable image, recognizer error) are isolated to this image:
/// they are logged and yield an empty list, never an error, so one bad frame
/// cannot void a capture batch.
pub fn scan_image(path: &Path, band: CropBand, recognizer: &dyn TextRecognizer) -> Vec<String> {
    match scan_image_inner(path, band, recognizer) {
        Ok(names) => names,
        Err(e) => {
            tracing::error!("error processing {}: {e}", path.display());
            Vec::new()
        }
    }
}

fn scan_image_inner(
    path: &Path,
    band: CropBand,
    recognizer: &dyn TextRecognizer,
) -> Result<Vec<String>> {
    let img = image::open(path).map_err(|e| SyncError::Recognition(e.to_string()))?;
    let cropped = crop_to_band(&img, band);

    // The recognizer reads from disk, so stage the cropped frame in a
    // transient file that disappears with this scope.
    let staged = tempfile::Builder::new().prefix("relay-scan-").suffix(".png").tempfile()?;
    cropped.save(staged.path()).map_err(|e| SyncError::Recognition(e.to_string()))?;

    let text = recognizer.recognize_text(staged.path())?;
    Ok(extract_names(&text))
}

/// Crop an image to its configured list band.
fn crop_to_band(img: &DynamicImage, band: CropBand) -> DynamicImage {
    let (width, height) = img.dimensions();
    if height == 0 {
        return img.clone();
    }
    let top = ((height as f64) * band.top).round() as u32;
    let bottom = ((height as f64) * band.bottom).round() as u32;
    let top = top.min(height.saturating_sub(1));
    let bottom = bottom.clamp(top + 1, height);
    img.crop_imm(0, top, width, bottom - top)
}

/// Split recognized text into candidate names: one per line, trimmed, blanks
/// dropped, duplicates removed preserving first-seen order.
pub fn extract_names(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut ordered = Vec::new();
    for line in text.lines() {
        let name = line.trim();
        if !name.is_empty() && seen.insert(name.to_string()) {
            ordered.push(name.to_string());
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct StaticRecognizer(&'static str);

    impl TextRecognizer for StaticRecognizer {
        fn recognize_text(&self, _image: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize_text(&self, _image: &Path) -> Result<String> {
            Err(SyncError::Recognition("scripted failure".to_string()))
        }
    }

    fn write_test_image(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("screen.png");
        DynamicImage::new_rgb8(40, 100).save(&path).expect("save image");
        path
    }

    #[test]
    fn test_extract_names_dedupes_in_first_seen_order() {
        let text = "aww\npolitics\n\n  aww  \nAskReddit\npolitics\n";
        assert_eq!(extract_names(text), vec!["aww", "politics", "AskReddit"]);
    }

    #[test]
    fn test_extract_names_is_case_sensitive() {
        let text = "AskReddit\naskreddit\n";
        assert_eq!(extract_names(text), vec!["AskReddit", "askreddit"]);
    }

    #[test]
    fn test_crop_to_band_keeps_middle_band() {
        let img = DynamicImage::new_rgb8(40, 100);
        let cropped = crop_to_band(&img, CropBand { top: 0.30, bottom: 0.80 });
        assert_eq!(cropped.dimensions(), (40, 50));
    }

    #[test]
    fn test_scan_image_returns_recognized_names() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_test_image(&tmp);

        let names = scan_image(
            &path,
            CropBand { top: 0.30, bottom: 0.80 },
            &StaticRecognizer("aww\naww\npolitics\n"),
        );
        assert_eq!(names, vec!["aww", "politics"]);
    }

    #[test]
    fn test_scan_image_isolates_recognizer_failure() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_test_image(&tmp);

        let names = scan_image(&path, CropBand { top: 0.30, bottom: 0.80 }, &FailingRecognizer);
        assert!(names.is_empty());
    }

    #[test]
    fn test_scan_image_isolates_unreadable_image() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("not-an-image.png");
        std::fs::write(&path, "plain text").expect("write");

        let names = scan_image(&path, CropBand { top: 0.30, bottom: 0.80 }, &FailingRecognizer);
        assert!(names.is_empty());
    }
}

use crate::domain::model::{Explanation, ExtractedText, UploadedImage};
use crate::domain::ports::{Presenter, Stage};
use crate::utils::error::{HelperError, Result};
use std::io::Write;
use std::path::Path;

/// Reads an image file for the `explain` command. Unreadable paths are
/// reported as input errors.
pub async fn load_image(path: &Path) -> Result<UploadedImage> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| HelperError::UnsupportedImage {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedImage::new(filename, None, bytes))
}

/// Prints the result regions as plain text sections.
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Presenting is best effort; a closed stdout must not abort the cycle.
    fn write_section(&mut self, heading: &str, body: &str) {
        if let Err(e) = writeln!(self.out, "{}\n{}\n", heading, body) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn show_image(&mut self, image: &UploadedImage) {
        self.write_section(
            "### 🖼️ Homework Image",
            &format!("{} ({} bytes)", image.filename(), image.len()),
        );
    }

    fn show_progress(&mut self, _stage: Stage) {}

    fn show_extracted_text(&mut self, text: &ExtractedText) {
        self.write_section("### ✏️ Extracted Text", text.as_str());
    }

    fn show_explanation(&mut self, explanation: &Explanation) {
        self.write_section("### 📘 Explanation", explanation.as_str());
    }

    fn show_error(&mut self, message: &str) {
        self.write_section("### ❌ Error", message);
    }
}

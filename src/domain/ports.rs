use crate::domain::model::{Explanation, ExtractedText, UploadedImage};
use crate::utils::error::{ExtractionError, GenerationError};
use async_trait::async_trait;

/// Sentence shown in place of an explanation when generation fails.
pub const EXPLANATION_FALLBACK: &str = "Sorry, the AI could not generate an explanation.";

/// Banner shown when OCR produced nothing worth explaining.
pub const UNREADABLE_TEXT_MESSAGE: &str = "Could not read the text. Try a clearer image.";

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(
        &self,
        image: &UploadedImage,
    ) -> std::result::Result<ExtractedText, ExtractionError>;

    /// Any failure becomes empty text.
    async fn extract(&self, image: &UploadedImage) -> ExtractedText {
        match self.extract_text(image).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("OCR failed, treating as no text: {}", e);
                ExtractedText::default()
            }
        }
    }
}

#[async_trait]
pub trait Explainer: Send + Sync {
    async fn generate(&self, text: &str) -> std::result::Result<Explanation, GenerationError>;

    /// Any failure becomes [`EXPLANATION_FALLBACK`].
    async fn explain(&self, text: &str) -> Explanation {
        match self.generate(text).await {
            Ok(explanation) => explanation,
            Err(e) => {
                tracing::warn!("Generation failed, using fallback: {}", e);
                Explanation::new(EXPLANATION_FALLBACK)
            }
        }
    }
}

/// Which remote call the handler is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reading,
    Explaining,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Reading => "Reading homework...",
            Stage::Explaining => "AI is explaining...",
        }
    }
}

/// The display regions of the UI.
pub trait Presenter: Send {
    fn show_image(&mut self, image: &UploadedImage);
    fn show_progress(&mut self, stage: Stage);
    fn show_extracted_text(&mut self, text: &ExtractedText);
    fn show_explanation(&mut self, explanation: &Explanation);
    fn show_error(&mut self, message: &str);
}

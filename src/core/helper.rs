use crate::core::session::HomeworkSession;
use crate::domain::model::{Outcome, UploadedImage};
use crate::domain::ports::{Explainer, Presenter, Stage, TextExtractor, UNREADABLE_TEXT_MESSAGE};
use crate::utils::error::Result;

/// Runs the read-then-explain cycle. The explainer is only called when OCR
/// produced something other than whitespace, and it gets the text untrimmed.
pub struct HomeworkHelper<E: TextExtractor, X: Explainer> {
    extractor: E,
    explainer: X,
}

impl<E: TextExtractor, X: Explainer> HomeworkHelper<E, X> {
    pub fn new(extractor: E, explainer: X) -> Self {
        Self {
            extractor,
            explainer,
        }
    }

    /// Processes the session's selected image and leaves the session Finished.
    pub async fn run<P: Presenter>(
        &self,
        session: &mut HomeworkSession,
        presenter: &mut P,
    ) -> Result<Outcome> {
        let image = session.begin()?;
        let outcome = self.process(&image, presenter).await;
        session.finish(outcome.clone());
        Ok(outcome)
    }

    /// Selects `image` in a fresh session and runs it.
    pub async fn explain_image<P: Presenter>(
        &self,
        image: UploadedImage,
        presenter: &mut P,
    ) -> Result<Outcome> {
        let mut session = HomeworkSession::new();
        session.select_image(image)?;
        self.run(&mut session, presenter).await
    }

    async fn process<P: Presenter>(&self, image: &UploadedImage, presenter: &mut P) -> Outcome {
        presenter.show_image(image);

        tracing::info!("📖 {}", Stage::Reading.label());
        presenter.show_progress(Stage::Reading);
        let extracted = self.extractor.extract(image).await;
        tracing::info!(
            "Extracted {} characters from {}",
            extracted.as_str().chars().count(),
            image.filename()
        );
        presenter.show_extracted_text(&extracted);

        if !extracted.is_readable() {
            tracing::warn!("No readable text in {}", image.filename());
            presenter.show_error(UNREADABLE_TEXT_MESSAGE);
            return Outcome::Unreadable { extracted };
        }

        tracing::info!("🤖 {}", Stage::Explaining.label());
        presenter.show_progress(Stage::Explaining);
        let explanation = self.explainer.explain(extracted.as_str()).await;
        presenter.show_explanation(&explanation);

        tracing::info!("✅ Explanation ready");
        Outcome::Explained {
            extracted,
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionState;
    use crate::domain::model::{Explanation, ExtractedText};
    use crate::domain::ports::EXPLANATION_FALLBACK;
    use crate::utils::error::{ExtractionError, GenerationError, HelperError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct MockExtractor {
        result: fn() -> std::result::Result<ExtractedText, ExtractionError>,
    }

    #[async_trait]
    impl TextExtractor for MockExtractor {
        async fn extract_text(
            &self,
            _image: &UploadedImage,
        ) -> std::result::Result<ExtractedText, ExtractionError> {
            (self.result)()
        }
    }

    #[derive(Clone, Default)]
    struct MockExplainer {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Explainer for MockExplainer {
        async fn generate(&self, text: &str) -> std::result::Result<Explanation, GenerationError> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.fail {
                Err(GenerationError::NoGenerations)
            } else {
                Ok(Explanation::new(format!("Explained: {}", text.trim())))
            }
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        events: Vec<String>,
    }

    impl Presenter for RecordingPresenter {
        fn show_image(&mut self, image: &UploadedImage) {
            self.events.push(format!("image:{}", image.filename()));
        }

        fn show_progress(&mut self, stage: Stage) {
            self.events.push(format!("progress:{:?}", stage));
        }

        fn show_extracted_text(&mut self, text: &ExtractedText) {
            self.events.push(format!("extracted:{}", text));
        }

        fn show_explanation(&mut self, explanation: &Explanation) {
            self.events.push(format!("explanation:{}", explanation));
        }

        fn show_error(&mut self, message: &str) {
            self.events.push(format!("error:{}", message));
        }
    }

    fn png() -> UploadedImage {
        UploadedImage::new("page.png", None, vec![1, 2, 3])
    }

    #[tokio::test]
    async fn test_readable_text_is_explained_once_untrimmed() {
        let explainer = MockExplainer::default();
        let helper = HomeworkHelper::new(
            MockExtractor {
                result: || Ok(ExtractedText::new("  2+2=?\r\n")),
            },
            explainer.clone(),
        );
        let mut presenter = RecordingPresenter::default();

        let outcome = helper.explain_image(png(), &mut presenter).await.unwrap();

        assert_eq!(*explainer.calls.lock().unwrap(), vec!["  2+2=?\r\n".to_string()]);
        assert_eq!(
            outcome.explanation().map(|e| e.as_str()),
            Some("Explained: 2+2=?")
        );
        assert_eq!(
            presenter.events,
            vec![
                "image:page.png",
                "progress:Reading",
                "extracted:  2+2=?\r\n",
                "progress:Explaining",
                "explanation:Explained: 2+2=?",
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_text_never_reaches_explainer() {
        let explainer = MockExplainer::default();
        let helper = HomeworkHelper::new(
            MockExtractor {
                result: || Ok(ExtractedText::new(" \n\t")),
            },
            explainer.clone(),
        );
        let mut presenter = RecordingPresenter::default();

        let outcome = helper.explain_image(png(), &mut presenter).await.unwrap();

        assert!(explainer.calls.lock().unwrap().is_empty());
        assert!(matches!(outcome, Outcome::Unreadable { .. }));
        assert_eq!(
            presenter.events.last().map(String::as_str),
            Some("error:Could not read the text. Try a clearer image.")
        );
    }

    #[tokio::test]
    async fn test_extraction_failure_shows_unreadable_error() {
        let explainer = MockExplainer::default();
        let helper = HomeworkHelper::new(
            MockExtractor {
                result: || Err(ExtractionError::NoParsedResults),
            },
            explainer.clone(),
        );
        let mut presenter = RecordingPresenter::default();

        let outcome = helper.explain_image(png(), &mut presenter).await.unwrap();

        assert!(explainer.calls.lock().unwrap().is_empty());
        assert_eq!(outcome.extracted().as_str(), "");
        assert!(presenter.events.contains(&"extracted:".to_string()));
    }

    #[tokio::test]
    async fn test_generation_failure_shows_fallback_as_explanation() {
        let explainer = MockExplainer {
            fail: true,
            ..Default::default()
        };
        let helper = HomeworkHelper::new(
            MockExtractor {
                result: || Ok(ExtractedText::new("x + 1 = 3")),
            },
            explainer.clone(),
        );
        let mut presenter = RecordingPresenter::default();

        let outcome = helper.explain_image(png(), &mut presenter).await.unwrap();

        assert_eq!(explainer.calls.lock().unwrap().len(), 1);
        assert_eq!(
            outcome.explanation().map(|e| e.as_str()),
            Some(EXPLANATION_FALLBACK)
        );
        assert_eq!(
            presenter.events.last().map(String::as_str),
            Some("explanation:Sorry, the AI could not generate an explanation.")
        );
    }

    #[tokio::test]
    async fn test_run_finishes_session() {
        let helper = HomeworkHelper::new(
            MockExtractor {
                result: || Ok(ExtractedText::new("1+1")),
            },
            MockExplainer::default(),
        );
        let mut presenter = RecordingPresenter::default();
        let mut session = HomeworkSession::new();

        let err = helper.run(&mut session, &mut presenter).await.unwrap_err();
        assert!(matches!(err, HelperError::InvalidState { .. }));

        session.select_image(png()).unwrap();
        let outcome = helper.run(&mut session, &mut presenter).await.unwrap();
        assert_eq!(session.state(), &SessionState::Finished(outcome));
    }

    #[tokio::test]
    async fn test_unsupported_image_is_rejected_before_any_call() {
        let explainer = MockExplainer::default();
        let helper = HomeworkHelper::new(
            MockExtractor {
                result: || panic!("extractor must not be called"),
            },
            explainer.clone(),
        );
        let mut presenter = RecordingPresenter::default();

        let err = helper
            .explain_image(UploadedImage::new("scan.tiff", None, vec![1]), &mut presenter)
            .await
            .unwrap_err();

        assert!(matches!(err, HelperError::UnsupportedImage { .. }));
        assert!(presenter.events.is_empty());
    }
}

use crate::domain::model::{Outcome, UploadedImage};
use crate::utils::error::{HelperError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    ImageSelected,
    Processing,
    Finished(Outcome),
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::ImageSelected => "waiting for the explain action",
            SessionState::Processing => "processing",
            SessionState::Finished(_) => "finished",
        }
    }
}

/// One user's upload/explain cycle.
///
/// Idle -> ImageSelected -> Processing -> Finished. Selecting another image
/// from ImageSelected or Finished starts over; nothing can be selected or
/// triggered while Processing.
#[derive(Debug)]
pub struct HomeworkSession {
    state: SessionState,
    image: Option<UploadedImage>,
}

impl Default for HomeworkSession {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeworkSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            image: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn select_image(&mut self, image: UploadedImage) -> Result<()> {
        if self.state == SessionState::Processing {
            return Err(self.invalid("select an image"));
        }
        image.validate()?;
        tracing::debug!("Image selected: {:?}", image);
        self.image = Some(image);
        self.state = SessionState::ImageSelected;
        Ok(())
    }

    /// Hands the selected image over for processing.
    pub(crate) fn begin(&mut self) -> Result<UploadedImage> {
        if self.state != SessionState::ImageSelected {
            return Err(self.invalid("explain"));
        }
        let image = self.image.take().ok_or_else(|| self.invalid("explain"))?;
        self.state = SessionState::Processing;
        Ok(image)
    }

    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.state = SessionState::Finished(outcome);
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            SessionState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    fn invalid(&self, action: &str) -> HelperError {
        HelperError::InvalidState {
            action: action.to_string(),
            state: self.state.name().to_string(),
        }
    }
}

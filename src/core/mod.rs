pub mod helper;
pub mod session;

pub use crate::domain::model::{Explanation, ExtractedText, Outcome, UploadedImage};
pub use crate::domain::ports::{Explainer, Presenter, Stage, TextExtractor};
pub use crate::utils::error::Result;

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{build_helper, CohereClient, OcrSpaceClient};
pub use config::{AppConfig, ConfigOverrides, GenerationSettings, OcrSettings, TomlConfig};
pub use core::{helper::HomeworkHelper, session::HomeworkSession};
pub use domain::model::{ApiKey, Explanation, ExtractedText, Outcome, UploadedImage};
pub use utils::error::{HelperError, Result};

// Adapters layer: concrete implementations of the domain ports for the remote providers.

pub mod generation;
pub mod http;
pub mod ocr;

pub use generation::CohereClient;
pub use ocr::OcrSpaceClient;

use crate::config::AppConfig;
use crate::core::helper::HomeworkHelper;
use crate::utils::error::Result;

/// Wires both provider clients from resolved config, sharing one HTTP client.
pub fn build_helper(config: &AppConfig) -> Result<HomeworkHelper<OcrSpaceClient, CohereClient>> {
    let client = http::build_client(config.timeout())?;
    Ok(HomeworkHelper::new(
        OcrSpaceClient::new(client.clone(), config.ocr.clone()),
        CohereClient::new(client, config.generation.clone()),
    ))
}

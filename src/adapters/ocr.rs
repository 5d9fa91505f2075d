use crate::adapters::http::truncate_body;
use crate::config::OcrSettings;
use crate::domain::model::{ExtractedText, UploadedImage};
use crate::domain::ports::TextExtractor;
use crate::utils::error::ExtractionError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

/// OCR.space `parse/image` client.
pub struct OcrSpaceClient {
    client: Client,
    settings: OcrSettings,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    parsed_results: Option<Vec<OcrSpaceParsedResult>>,
    is_errored_on_processing: Option<serde_json::Value>,
    error_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceParsedResult {
    parsed_text: Option<String>,
}

impl OcrSpaceResponse {
    fn into_text(self) -> Result<ExtractedText, ExtractionError> {
        let provider_error = self.provider_error();
        match self.parsed_results.and_then(|results| results.into_iter().next()) {
            Some(first) => first
                .parsed_text
                .map(ExtractedText::new)
                .ok_or(ExtractionError::MissingText),
            None => Err(match provider_error {
                Some(message) => ExtractionError::Provider { message },
                None => ExtractionError::NoParsedResults,
            }),
        }
    }

    // ErrorMessage comes back either as a string or as a list of strings.
    fn provider_error(&self) -> Option<String> {
        let message = match &self.error_message {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Array(items)) if !items.is_empty() => Some(
                items
                    .iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        };
        let errored = self
            .is_errored_on_processing
            .as_ref()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        match message {
            Some(message) => Some(message),
            None if errored => Some("processing failed".to_string()),
            None => None,
        }
    }
}

impl OcrSpaceClient {
    pub fn new(client: Client, settings: OcrSettings) -> Self {
        Self { client, settings }
    }

    fn form(&self, image: &UploadedImage) -> Result<Form, ExtractionError> {
        let file = Part::bytes(image.bytes().to_vec())
            .file_name(image.filename().to_string())
            .mime_str(image.content_type())?;

        Ok(Form::new()
            .text("apikey", self.settings.api_key.expose().to_string())
            .text("language", self.settings.language.clone())
            .text("isOverlayRequired", "false")
            .part("file", file))
    }
}

#[async_trait]
impl TextExtractor for OcrSpaceClient {
    async fn extract_text(&self, image: &UploadedImage) -> Result<ExtractedText, ExtractionError> {
        tracing::debug!(
            "Sending {} ({} bytes, {}) to OCR endpoint {}",
            image.filename(),
            image.len(),
            image.content_type(),
            self.settings.endpoint
        );

        let response = self
            .client
            .post(&self.settings.endpoint)
            .multipart(self.form(image)?)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("OCR response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OcrSpaceResponse = serde_json::from_str(&body)?;
        let text = parsed.into_text()?;
        tracing::debug!("OCR extracted {} characters", text.as_str().chars().count());
        Ok(text)
    }
}

use crate::utils::error::{HelperError, Result};
use crate::utils::validation::validate_file_extensions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extensions the upload control accepts.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A photo selected by the user, held for one interaction only.
#[derive(Clone)]
pub struct UploadedImage {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl UploadedImage {
    /// When the uploader sends no content type (or a generic one), it is
    /// guessed from the file extension.
    pub fn new(filename: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = match content_type {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct,
            _ => content_type_for(&filename).to_string(),
        };
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Mirrors the upload control: JPEG or PNG by name, and something to send.
    pub fn validate(&self) -> Result<()> {
        validate_file_extensions(
            "image",
            std::slice::from_ref(&self.filename),
            SUPPORTED_IMAGE_EXTENSIONS,
        )
        .map_err(|e| HelperError::UnsupportedImage {
            reason: match e {
                HelperError::InvalidConfigValueError { reason, .. } => reason,
                other => other.to_string(),
            },
        })?;

        if self.bytes.is_empty() {
            return Err(HelperError::UnsupportedImage {
                reason: format!("{} is empty", self.filename),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Text read from the image by OCR; may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Worth explaining only if something other than whitespace was read.
    pub fn is_readable(&self) -> bool {
        !self.0.trim().is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generated prose, or the fixed fallback sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Explanation(String);

impl Explanation {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider secret. Never printed: `Debug` masks the value.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// What the user ends up seeing once an interaction finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Explained {
        extracted: ExtractedText,
        explanation: Explanation,
    },
    Unreadable {
        extracted: ExtractedText,
    },
}

impl Outcome {
    pub fn extracted(&self) -> &ExtractedText {
        match self {
            Outcome::Explained { extracted, .. } | Outcome::Unreadable { extracted } => extracted,
        }
    }

    pub fn explanation(&self) -> Option<&Explanation> {
        match self {
            Outcome::Explained { explanation, .. } => Some(explanation),
            Outcome::Unreadable { .. } => None,
        }
    }
}

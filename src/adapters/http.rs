use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Shared client for both providers. Every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(concat!("homework-helper/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Keeps error bodies short enough to log.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}

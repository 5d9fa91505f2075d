use crate::adapters::http::truncate_body;
use crate::config::GenerationSettings;
use crate::domain::model::Explanation;
use crate::domain::ports::Explainer;
use crate::utils::error::GenerationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Wraps the homework text in the tutor instructions. The text is embedded
/// as-is: no escaping, no length cap.
pub fn build_prompt(text: &str) -> String {
    format!(
        "\nYou are a friendly school tutor.\n\
         Explain the homework below step-by-step in very simple language.\n\
         Make it easy for a student to understand.\n\
         \n\
         Homework:\n\
         {}\n",
        text
    )
}

/// Cohere `v1/generate` client.
pub struct CohereClient {
    client: Client,
    settings: GenerationSettings,
}

#[derive(Serialize, Clone, Debug)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize, Clone, Debug)]
struct GenerateResponse {
    generations: Option<Vec<Generation>>,
}

#[derive(Deserialize, Clone, Debug)]
struct Generation {
    text: Option<String>,
}

impl CohereClient {
    pub fn new(client: Client, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl Explainer for CohereClient {
    async fn generate(&self, text: &str) -> Result<Explanation, GenerationError> {
        let request = GenerateRequest {
            model: &self.settings.model,
            prompt: build_prompt(text),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        tracing::debug!(
            "Requesting explanation from {} (model {}, prompt {} chars)",
            self.settings.endpoint,
            self.settings.model,
            request.prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(self.settings.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Generation response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        let first = parsed
            .generations
            .and_then(|generations| generations.into_iter().next())
            .ok_or(GenerationError::NoGenerations)?;

        first
            .text
            .map(Explanation::new)
            .ok_or(GenerationError::MissingText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::build_client;
    use crate::domain::model::ApiKey;
    use crate::domain::ports::EXPLANATION_FALLBACK;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn client_for(server: &MockServer) -> CohereClient {
        let mut settings = GenerationSettings::new(ApiKey::new("test-cohere-key"));
        settings.endpoint = server.url("/v1/generate");
        CohereClient::new(build_client(Duration::from_secs(5)).unwrap(), settings)
    }

    #[test]
    fn test_prompt_embeds_text_verbatim() {
        let prompt = build_prompt("Solve: \"x\" + {y} = 3");
        assert_eq!(
            prompt,
            "\nYou are a friendly school tutor.\n\
             Explain the homework below step-by-step in very simple language.\n\
             Make it easy for a student to understand.\n\
             \n\
             Homework:\n\
             Solve: \"x\" + {y} = 3\n"
        );
    }

    #[tokio::test]
    async fn test_generate_sends_expected_request() {
        let server = MockServer::start();
        let expected_body = serde_json::json!({
            "model": "command-a-03-2025",
            "prompt": build_prompt("2+2=?"),
            "max_tokens": 450,
            "temperature": 0.4
        });

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/generate")
                .header("authorization", "Bearer test-cohere-key")
                .header("content-type", "application/json")
                .json_body(expected_body);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "id": "abc",
                    "generations": [{"id": "g1", "text": "Step 1: add two and two."}]
                }));
        });

        let explanation = client_for(&server).explain("2+2=?").await;

        api_mock.assert();
        assert_eq!(explanation.as_str(), "Step 1: add two and two.");
    }

    #[tokio::test]
    async fn test_first_generation_wins() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/generate");
            then.status(200).json_body(serde_json::json!({
                "generations": [{"text": "first"}, {"text": "second"}]
            }));
        });

        let explanation = client_for(&server).generate("text").await.unwrap();
        assert_eq!(explanation.as_str(), "first");
    }

    #[tokio::test]
    async fn test_empty_generations_falls_back() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/generate");
            then.status(200).json_body(serde_json::json!({"generations": []}));
        });

        let client = client_for(&server);
        let err = client.generate("text").await.unwrap_err();
        assert!(matches!(err, GenerationError::NoGenerations));
        assert_eq!(client.explain("text").await.as_str(), EXPLANATION_FALLBACK);
    }

    #[tokio::test]
    async fn test_missing_generations_field_falls_back() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/generate");
            then.status(200).json_body(serde_json::json!({"message": "ok?"}));
        });

        let client = client_for(&server);
        assert!(matches!(
            client.generate("text").await.unwrap_err(),
            GenerationError::NoGenerations
        ));
        assert_eq!(client.explain("text").await.as_str(), EXPLANATION_FALLBACK);
    }

    #[tokio::test]
    async fn test_unauthorized_falls_back() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/generate");
            then.status(401)
                .json_body(serde_json::json!({"message": "invalid api token"}));
        });

        let client = client_for(&server);
        assert!(matches!(
            client.generate("text").await.unwrap_err(),
            GenerationError::Status { status: 401, .. }
        ));
        assert_eq!(client.explain("text").await.as_str(), EXPLANATION_FALLBACK);
    }

    #[tokio::test]
    async fn test_generation_without_text_falls_back() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/generate");
            then.status(200)
                .json_body(serde_json::json!({"generations": [{"id": "g1"}]}));
        });

        let client = client_for(&server);
        assert!(matches!(
            client.generate("text").await.unwrap_err(),
            GenerationError::MissingText
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        // Bind then drop a listener to get a port nothing is listening on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut settings = GenerationSettings::new(ApiKey::new("test-cohere-key"));
        settings.endpoint = format!("http://127.0.0.1:{}/v1/generate", port);
        let client = CohereClient::new(build_client(Duration::from_secs(2)).unwrap(), settings);

        assert!(matches!(
            client.generate("text").await.unwrap_err(),
            GenerationError::Transport(_)
        ));
        assert_eq!(client.explain("text").await.as_str(), EXPLANATION_FALLBACK);
    }

    #[tokio::test]
    async fn test_non_json_body_falls_back() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/generate");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html>oops</html>");
        });

        let client = client_for(&server);
        assert!(matches!(
            client.generate("text").await.unwrap_err(),
            GenerationError::Decode(_)
        ));
        assert_eq!(client.explain("text").await.as_str(), EXPLANATION_FALLBACK);
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_slow_generation_is_cut_off_by_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/generate");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({"generations": [{"text": "late"}]}));
        });

        let mut settings = GenerationSettings::new(ApiKey::new("test-cohere-key"));
        settings.endpoint = server.url("/v1/generate");
        let client = CohereClient::new(build_client(Duration::from_secs(1)).unwrap(), settings);

        let err = client.generate("text").await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(ref e) if e.is_timeout()));
    }
}

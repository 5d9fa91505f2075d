//! Upload page and JSON endpoint over [`HomeworkHelper`].
//!
//! `GET /` serves a single page; the browser shows the preview as soon as a
//! file is picked, then posts it to `POST /api/explain` when the button is
//! pressed. Each request is its own session, so nothing is shared between
//! users beyond the read-only clients.

use crate::core::helper::HomeworkHelper;
use crate::domain::model::{Explanation, ExtractedText, UploadedImage};
use crate::domain::ports::{Explainer, Presenter, Stage, TextExtractor};
use crate::utils::error::{ErrorCategory, HelperError, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

/// 10 MiB of image plus multipart overhead.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024 + 64 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub extracted_text: String,
    pub explanation: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Fills the three result regions of the page.
#[derive(Default)]
struct JsonPresenter {
    response: ExplainResponse,
}

impl Presenter for JsonPresenter {
    fn show_image(&mut self, image: &UploadedImage) {
        tracing::debug!("Processing upload {:?}", image);
    }

    fn show_progress(&mut self, stage: Stage) {
        tracing::debug!("{}", stage.label());
    }

    fn show_extracted_text(&mut self, text: &ExtractedText) {
        self.response.extracted_text = text.as_str().to_string();
    }

    fn show_explanation(&mut self, explanation: &Explanation) {
        self.response.explanation = Some(explanation.as_str().to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.response.error = Some(message.to_string());
    }
}

pub fn router<E, X>(helper: Arc<HomeworkHelper<E, X>>) -> Router
where
    E: TextExtractor + 'static,
    X: Explainer + 'static,
{
    Router::new()
        .route("/", get(serve_page))
        .route("/api/explain", post(handle_explain::<E, X>))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(helper)
}

/// Binds `bind` and serves until Ctrl-C.
pub async fn serve<E, X>(helper: Arc<HomeworkHelper<E, X>>, bind: &str) -> Result<()>
where
    E: TextExtractor + 'static,
    X: Explainer + 'static,
{
    let listener = TcpListener::bind(bind).await?;
    let addr = listener.local_addr()?;
    tracing::info!(addr = %addr, "📘 Homework Helper listening on http://{}", addr);

    axum::serve(listener, router(helper))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HelperError::ServerError {
            message: e.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn serve_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

async fn handle_explain<E, X>(
    State(helper): State<Arc<HomeworkHelper<E, X>>>,
    mut multipart: Multipart,
) -> Response
where
    E: TextExtractor + 'static,
    X: Explainer + 'static,
{
    let mut image: Option<UploadedImage> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => {
                        image = Some(UploadedImage::new(filename, content_type, bytes.to_vec()));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read upload bytes: {}", e);
                        return error_response(StatusCode::BAD_REQUEST, "Failed to read file data.");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed multipart request: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "Malformed upload.");
            }
        }
    }

    let Some(image) = image else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided.");
    };

    let mut presenter = JsonPresenter::default();
    match helper.explain_image(image, &mut presenter).await {
        Ok(_) => Json(presenter.response).into_response(),
        Err(e) => {
            tracing::warn!("Upload rejected: {}", e);
            let status = match e.category() {
                ErrorCategory::Input => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_response(status, &e.user_friendly_message())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

const UPLOAD_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Homework Helper AI</title>
  <style>
    * { box-sizing: border-box; }
    body {
      margin: 0; padding: 24px;
      background: linear-gradient(135deg, #eef3ff, #ffffff);
      font-family: "Segoe UI", system-ui, sans-serif; color: #1f2937;
    }
    main { max-width: 720px; margin: 0 auto; }
    h1 { text-align: center; color: #1e40af; }
    h3 { text-align: center; color: #2563eb; font-weight: 500; }
    .card {
      background: white; padding: 1.6em; border-radius: 22px;
      box-shadow: 0 18px 35px rgba(0,0,0,0.08); margin-top: 1.2em;
    }
    #preview { display: none; max-width: 100%; border-radius: 14px; margin-top: 1em; }
    button {
      width: 100%; margin-top: 1em; padding: 0.7em; font-size: 17px;
      background: #2563eb; color: white; border: none; border-radius: 14px; cursor: pointer;
    }
    button:disabled { background: #93c5fd; cursor: wait; }
    textarea {
      width: 100%; height: 160px; border-radius: 14px; padding: 0.6em;
      border: 1px solid #d1d5db; font-family: inherit;
    }
    .hidden { display: none; }
    .spinner { color: #2563eb; margin-top: 1em; }
    .explanation {
      background: #ecfdf5; color: #065f46; border-radius: 14px; padding: 1em; white-space: pre-wrap;
    }
    .error { background: #fef2f2; color: #991b1b; border-radius: 14px; padding: 1em; }
    footer { text-align: center; color: gray; margin-top: 1em; font-size: 14px; }
  </style>
</head>
<body>
<main>
  <h1>📘 Homework Helper AI</h1>
  <h3>Take a photo of your homework and get help instantly</h3>
  <div class="card">
    <label for="file">📸 Upload or take a picture of your homework</label><br>
    <input id="file" type="file" accept=".jpg,.jpeg,.png,image/jpeg,image/png">
    <img id="preview" alt="Homework Image">
    <button id="explain" class="hidden">🧠 Read &amp; Explain Homework</button>
    <div id="spinner" class="spinner hidden"></div>
    <section id="extracted-section" class="hidden">
      <h4>✏️ Extracted Text</h4>
      <textarea id="extracted" readonly></textarea>
    </section>
    <section id="explanation-section" class="hidden">
      <h4>📘 Explanation</h4>
      <div id="explanation" class="explanation"></div>
    </section>
    <div id="error" class="error hidden"></div>
  </div>
  <footer>Made for students • Smart learning • Clean &amp; safe</footer>
</main>
<script>
  const fileInput = document.getElementById('file');
  const preview = document.getElementById('preview');
  const button = document.getElementById('explain');
  const spinner = document.getElementById('spinner');
  const extractedSection = document.getElementById('extracted-section');
  const extracted = document.getElementById('extracted');
  const explanationSection = document.getElementById('explanation-section');
  const explanation = document.getElementById('explanation');
  const errorBox = document.getElementById('error');

  function resetResults() {
    extractedSection.classList.add('hidden');
    explanationSection.classList.add('hidden');
    errorBox.classList.add('hidden');
  }

  fileInput.addEventListener('change', () => {
    resetResults();
    const file = fileInput.files[0];
    if (!file) {
      preview.style.display = 'none';
      button.classList.add('hidden');
      return;
    }
    preview.src = URL.createObjectURL(file);
    preview.style.display = 'block';
    button.classList.remove('hidden');
  });

  button.addEventListener('click', async () => {
    const file = fileInput.files[0];
    if (!file) return;
    resetResults();
    button.disabled = true;
    fileInput.disabled = true;
    spinner.textContent = '📖 Reading homework... 🤖 AI is explaining...';
    spinner.classList.remove('hidden');

    const form = new FormData();
    form.append('file', file);
    try {
      const response = await fetch('/api/explain', { method: 'POST', body: form });
      const body = await response.json();
      if (!response.ok) {
        errorBox.textContent = '❌ ' + body.error;
        errorBox.classList.remove('hidden');
        return;
      }
      extracted.value = body.extracted_text;
      extractedSection.classList.remove('hidden');
      if (body.explanation !== null) {
        explanation.textContent = body.explanation;
        explanationSection.classList.remove('hidden');
      }
      if (body.error !== null) {
        errorBox.textContent = '❌ ' + body.error;
        errorBox.classList.remove('hidden');
      }
    } catch (e) {
      errorBox.textContent = '❌ Could not reach the server. Please try again.';
      errorBox.classList.remove('hidden');
    } finally {
      spinner.classList.add('hidden');
      button.disabled = false;
      fileInput.disabled = false;
    }
  });
</script>
</body>
</html>
"#;

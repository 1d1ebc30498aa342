use crate::api::dto::{
    AddWordRequest, CreateWordListRequest, GenerateQuizRequest, LoginRequest, PdfExtraction,
    QuizDto, RegisterRequest, TokenResponse, UserProfile, WordListDto,
};
use crate::api::error::ApiError;
use crate::config::Settings;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Calls made against the word-learning backend and the PDF service.
///
/// `login` and `register` keep the returned token for subsequent calls; any
/// 401/403 answer drops it.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError>;
    async fn register(&self, email: &str, password: &str, name: &str) -> Result<(), ApiError>;
    fn has_token(&self) -> bool;
    fn clear_token(&self);
    async fn profile(&self) -> Result<UserProfile, ApiError>;
    async fn my_word_lists(&self) -> Result<Vec<WordListDto>, ApiError>;
    async fn create_word_list(&self, name: &str) -> Result<(), ApiError>;
    async fn add_word(&self, list_id: i64, request: &AddWordRequest) -> Result<(), ApiError>;
    async fn delete_word_list(&self, list_id: i64) -> Result<(), ApiError>;
    async fn remove_word(&self, list_id: i64, word_id: i64) -> Result<(), ApiError>;
    async fn generate_quiz(&self, list_id: i64) -> Result<QuizDto, ApiError>;
    async fn extract_pdf(&self, pdf_bytes: Vec<u8>) -> Result<PdfExtraction, ApiError>;
}

#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    pdf_url: String,
    token: Mutex<Option<String>>,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("vocab-quiz/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            pdf_url: settings.pdf_service_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    fn token_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_token(&self, token: String) {
        *self.token_slot() = Some(token);
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json");
        self.authorize(builder)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token_slot().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and returns the raw body of a successful response.
    async fn execute(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = send(builder).await?;
        let status = response.status();
        let body = read_body(response).await?;

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("HTTP {} received, dropping session token", status.as_u16());
            self.clear_token();
        }
        let error = ApiError::from_status(status.as_u16(), error_message(&body));
        tracing::warn!("Request failed: {}", error);
        Err(error)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<String, ApiError> {
        self.execute(self.request(method, path).json(body)).await
    }

    fn obtain_token(&self, body: String) -> Result<(), ApiError> {
        let response: TokenResponse = decode(&body)?;
        match response.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.set_token(token);
                Ok(())
            }
            None => Err(ApiError::Decode("response carried no token".to_string())),
        }
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = self
            .send_json(Method::POST, "/auth/login", &LoginRequest { email, password })
            .await?;
        self.obtain_token(body)
    }

    async fn register(&self, email: &str, password: &str, name: &str) -> Result<(), ApiError> {
        let request = RegisterRequest {
            email,
            password,
            name,
        };
        let body = self
            .send_json(Method::POST, "/auth/register", &request)
            .await?;
        self.obtain_token(body)
    }

    fn has_token(&self) -> bool {
        self.token_slot().is_some()
    }

    fn clear_token(&self) {
        *self.token_slot() = None;
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        let body = self.execute(self.request(Method::GET, "/user/profile")).await?;
        decode(&body)
    }

    async fn my_word_lists(&self) -> Result<Vec<WordListDto>, ApiError> {
        let body = self
            .execute(self.request(Method::GET, "/wordlist/get-mine"))
            .await?;
        decode_or_default(&body)
    }

    async fn create_word_list(&self, name: &str) -> Result<(), ApiError> {
        self.send_json(Method::POST, "/wordlist/create", &CreateWordListRequest { name })
            .await?;
        Ok(())
    }

    async fn add_word(&self, list_id: i64, request: &AddWordRequest) -> Result<(), ApiError> {
        let path = format!("/wordlist/{}/add-word", list_id);
        self.send_json(Method::POST, &path, request).await?;
        Ok(())
    }

    async fn delete_word_list(&self, list_id: i64) -> Result<(), ApiError> {
        let path = format!("/wordlist/{}", list_id);
        self.execute(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn remove_word(&self, list_id: i64, word_id: i64) -> Result<(), ApiError> {
        let path = format!("/wordlist/{}/word/{}", list_id, word_id);
        self.execute(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn generate_quiz(&self, list_id: i64) -> Result<QuizDto, ApiError> {
        let body = self
            .send_json(
                Method::POST,
                "/quiz/generate-quiz",
                &GenerateQuizRequest {
                    word_list_id: list_id,
                },
            )
            .await?;
        decode_or_default(&body)
    }

    async fn extract_pdf(&self, pdf_bytes: Vec<u8>) -> Result<PdfExtraction, ApiError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&pdf_bytes);
        tracing::info!(
            "Sending PDF to extraction service ({} base64 chars)",
            encoded.len()
        );

        let builder = self
            .http
            .post(format!("{}/extract-pdf-base64", self.pdf_url))
            .header("Accept", "application/json")
            .form(&[("base64_data", encoded)]);
        let response = send(self.authorize(builder)).await?;
        let status = response.status();
        let body = read_body(response).await?;

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
                .unwrap_or_else(|| format!("PDF extraction failed: {}", status.as_u16()));
            tracing::warn!("PDF extraction rejected: {}", message);
            return Err(ApiError::Pdf(message));
        }

        let result: PdfExtraction = decode(&body)?;
        if !result.success {
            return Err(ApiError::Pdf(
                result
                    .error
                    .unwrap_or_else(|| "PDF extraction failed".to_string()),
            ));
        }
        tracing::info!(
            "PDF processed: {} pages, {} chars, method {}",
            result.page_count,
            result.text.chars().count(),
            result.method
        );
        Ok(result)
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    builder.send().await.map_err(|e| {
        tracing::warn!("Request failed before a response: {}", e);
        ApiError::from(e)
    })
}

/// Reads the whole body. A body cut off mid-transfer is an error, never an
/// empty success.
async fn read_body(response: Response) -> Result<String, ApiError> {
    response.text().await.map_err(|e| {
        tracing::warn!("Failed to read response body: {}", e);
        ApiError::from(e)
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_or_default<T: DeserializeOwned + Default>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() || body.trim() == "null" {
        return Ok(T::default());
    }
    decode(body)
}

/// Pulls `message` (API) or `detail` (PDF service) out of an error body.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("detail"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

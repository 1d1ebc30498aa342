//! In-memory `Backend` used by flow tests.

use crate::api::dto::{AddWordRequest, PdfExtraction, QuizDto, UserProfile, WordListDto};
use crate::api::{ApiError, Backend};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct FakeState {
    pub token: Option<String>,
    pub profile: Option<UserProfile>,
    pub lists: Vec<WordListDto>,
    pub quiz: QuizDto,
    pub pdf: PdfExtraction,
    pub added_words: Vec<(i64, AddWordRequest)>,
    pub calls: Vec<String>,
    /// Errors handed out, one per call, before normal behaviour resumes.
    pub failures: VecDeque<ApiError>,
    pub delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(email: &str, name: &str) -> Self {
        let fake = Self::new();
        fake.state().profile = Some(UserProfile {
            email: email.to_string(),
            name: name.to_string(),
        });
        fake
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail_next(&self, error: ApiError) {
        self.state().failures.push_back(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    async fn enter(&self, call: &str) -> Result<(), ApiError> {
        let (delay, failure) = {
            let mut state = self.state();
            state.calls.push(call.to_string());
            (state.delay, state.failures.pop_front())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(error) => {
                if error.is_auth_failure() {
                    self.state().token = None;
                }
                Err(error)
            }
            None => Ok(()),
        }
    }

    fn require_token(&self) -> Result<(), ApiError> {
        if self.state().token.is_some() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized { status: 401 })
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, email: &str, _password: &str) -> Result<(), ApiError> {
        self.enter("login").await?;
        self.state().token = Some(format!("token-{}", email));
        Ok(())
    }

    async fn register(&self, email: &str, _password: &str, name: &str) -> Result<(), ApiError> {
        self.enter("register").await?;
        let mut state = self.state();
        state.token = Some(format!("token-{}", email));
        state.profile = Some(UserProfile {
            email: email.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn has_token(&self) -> bool {
        self.state().token.is_some()
    }

    fn clear_token(&self) {
        self.state().token = None;
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.enter("profile").await?;
        self.require_token()?;
        self.state()
            .profile
            .clone()
            .ok_or_else(|| ApiError::Decode("no profile".to_string()))
    }

    async fn my_word_lists(&self) -> Result<Vec<WordListDto>, ApiError> {
        self.enter("my_word_lists").await?;
        self.require_token()?;
        Ok(self.state().lists.clone())
    }

    async fn create_word_list(&self, name: &str) -> Result<(), ApiError> {
        self.enter("create_word_list").await?;
        let mut state = self.state();
        let id = state.lists.len() as i64 + 1;
        state.lists.push(WordListDto {
            word_list_id: id,
            name: Some(name.to_string()),
            words: vec![],
        });
        Ok(())
    }

    async fn add_word(&self, list_id: i64, request: &AddWordRequest) -> Result<(), ApiError> {
        self.enter("add_word").await?;
        self.state().added_words.push((list_id, request.clone()));
        Ok(())
    }

    async fn delete_word_list(&self, list_id: i64) -> Result<(), ApiError> {
        self.enter("delete_word_list").await?;
        self.state().lists.retain(|l| l.word_list_id != list_id);
        Ok(())
    }

    async fn remove_word(&self, list_id: i64, word_id: i64) -> Result<(), ApiError> {
        self.enter("remove_word").await?;
        let mut state = self.state();
        if let Some(list) = state.lists.iter_mut().find(|l| l.word_list_id == list_id) {
            list.words.retain(|w| w.id != Some(word_id));
        }
        Ok(())
    }

    async fn generate_quiz(&self, _list_id: i64) -> Result<QuizDto, ApiError> {
        self.enter("generate_quiz").await?;
        Ok(self.state().quiz.clone())
    }

    async fn extract_pdf(&self, _pdf_bytes: Vec<u8>) -> Result<PdfExtraction, ApiError> {
        self.enter("extract_pdf").await?;
        Ok(self.state().pdf.clone())
    }
}

use crate::adapter::{format_questions, max_question_count};
use crate::api::dto::QuizDto;
use crate::models::{Question, WordList};
use rand::Rng;
use std::time::{Duration, Instant};
use thiserror::Error;

const LOADING_MESSAGES: [&str; 4] = [
    "Preparing questions...",
    "Analysing words...",
    "Building the quiz...",
    "Final touches...",
];
const LOADING_ROTATION: Duration = Duration::from_millis(1500);
const MAX_COUNT_DIGITS: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("This list has no words yet. Add some words before starting a quiz.")]
    EmptyList,
    #[error("Enter a question count of at least 1.")]
    InvalidCount,
    #[error(
        "Not enough questions could be generated for this list. Lists need several words with synonyms."
    )]
    NoQuestions,
    #[error("Something went wrong while preparing the quiz. Please try again.")]
    NoneUsable,
    #[error("{0}")]
    Request(String),
}

impl SetupError {
    /// Informational notices send the user back to count entry; the rest offer a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SetupError::NoneUsable | SetupError::Request(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Count,
    Loading { started: Instant },
    Failed,
}

/// Question-count entry and quiz generation for one word list.
#[derive(Debug)]
pub struct QuizSetup {
    pub list: WordList,
    pub count_input: String,
    step: SetupStep,
    requested: usize,
    error: Option<SetupError>,
}

impl QuizSetup {
    pub fn new(list: WordList) -> Result<Self, SetupError> {
        if list.word_count() == 0 {
            tracing::info!("Refusing quiz setup for empty list {}", list.id);
            return Err(SetupError::EmptyList);
        }
        Ok(Self {
            list,
            count_input: String::new(),
            step: SetupStep::Count,
            requested: 0,
            error: None,
        })
    }

    pub fn step(&self) -> SetupStep {
        self.step
    }

    pub fn error(&self) -> Option<&SetupError> {
        self.error.as_ref()
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn max_questions(&self) -> usize {
        max_question_count(self.list.word_count())
    }

    pub fn push_char(&mut self, c: char) {
        if self.step == SetupStep::Count
            && c.is_ascii_digit()
            && self.count_input.len() < MAX_COUNT_DIGITS
        {
            self.count_input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.step == SetupStep::Count {
            self.count_input.pop();
        }
    }

    /// Parses the typed count and clamps it to what the list can support.
    pub fn parsed_count(&self) -> Result<usize, SetupError> {
        match self.count_input.trim().parse::<usize>() {
            Ok(count) if count >= 1 => Ok(count.min(self.max_questions())),
            _ => Err(SetupError::InvalidCount),
        }
    }

    /// Moves to the loading step and returns the count to request.
    pub fn begin(&mut self, now: Instant) -> Result<usize, SetupError> {
        let count = self.parsed_count()?;
        self.requested = count;
        self.error = None;
        self.step = SetupStep::Loading { started: now };
        tracing::info!(
            "Generating quiz for list {} with {} questions",
            self.list.id,
            count
        );
        Ok(count)
    }

    /// Re-issues the last request after a failure.
    pub fn retry(&mut self, now: Instant) -> Option<usize> {
        if self.step != SetupStep::Failed || self.requested == 0 {
            return None;
        }
        self.error = None;
        self.step = SetupStep::Loading { started: now };
        Some(self.requested)
    }

    pub fn fail(&mut self, error: SetupError) {
        tracing::warn!("Quiz setup for list {} failed: {}", self.list.id, error);
        self.step = SetupStep::Failed;
        self.error = Some(error);
    }

    pub fn back_to_count(&mut self) {
        self.step = SetupStep::Count;
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.step, SetupStep::Loading { .. })
    }

    pub fn loading_message(&self, now: Instant) -> &'static str {
        let SetupStep::Loading { started } = self.step else {
            return LOADING_MESSAGES[0];
        };
        let elapsed = now.saturating_duration_since(started);
        let index = (elapsed.as_millis() / LOADING_ROTATION.as_millis()) as usize;
        LOADING_MESSAGES[index % LOADING_MESSAGES.len()]
    }
}

/// Turns a generated quiz into the questions a session will play.
pub fn resolve_questions<R: Rng + ?Sized>(
    quiz: &QuizDto,
    requested: usize,
    rng: &mut R,
) -> Result<Vec<Question>, SetupError> {
    if quiz.questions.is_empty() {
        return Err(SetupError::NoQuestions);
    }
    let questions = format_questions(&quiz.questions, requested, rng);
    if questions.is_empty() {
        return Err(SetupError::NoneUsable);
    }
    tracing::debug!(
        "Quiz {:?} resolved to {} questions",
        quiz.quiz_id,
        questions.len()
    );
    Ok(questions)
}

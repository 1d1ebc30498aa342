use crate::models::{AnswerEvent, AnswerRecord, AppState, Question, QuizResult};
use crate::quiz::{Delay, QuestionRenderer, Renderer};
use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Pause between a judged answer and the next question (or the result).
pub const ADVANCE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a quiz session needs at least one question")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Answering,
    Advancing,
    Complete,
}

/// One run through a fixed list of questions. Nothing here is persisted; dropping
/// the session discards it along with any pending delays.
#[derive(Debug)]
pub struct QuizSession {
    pub list_name: String,
    questions: Vec<Question>,
    pub current_index: usize,
    pub score: usize,
    answer_log: Vec<AnswerRecord>,
    renderer: QuestionRenderer,
    phase: SessionPhase,
    advance: Delay,
    rng: StdRng,
}

impl QuizSession {
    pub fn new(
        list_name: impl Into<String>,
        questions: Vec<Question>,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        let first = questions.first().ok_or(SessionError::Empty)?;
        let renderer = QuestionRenderer::for_question(first, &mut rng);
        let list_name = list_name.into();
        tracing::info!(
            "Quiz session started for '{}' with {} questions",
            list_name,
            questions.len()
        );
        Ok(Self {
            list_name,
            questions,
            current_index: 0,
            score: 0,
            answer_log: Vec::new(),
            renderer,
            phase: SessionPhase::Answering,
            advance: Delay::idle(),
            rng,
        })
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn renderer(&self) -> &QuestionRenderer {
        &self.renderer
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn answer_log(&self) -> &[AnswerRecord] {
        &self.answer_log
    }

    /// Outcome of the answer judged for the current question, if any.
    pub fn last_outcome(&self) -> Option<bool> {
        match self.phase {
            SessionPhase::Answering => None,
            _ => self.answer_log.last().map(|r| r.is_correct),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if self.phase == SessionPhase::Answering {
            self.renderer.handle_key(key, now);
        }
    }

    /// Accepts one judged answer for the current question.
    ///
    /// Anything arriving while the previous answer is still being processed is
    /// dropped.
    pub fn record_answer(&mut self, event: AnswerEvent, now: Instant) -> bool {
        if self.phase != SessionPhase::Answering {
            tracing::warn!(
                "Ignoring answer event for question {} in phase {:?}",
                self.current_index,
                self.phase
            );
            return false;
        }

        let question_id = self.current_question().id().to_string();
        if event.is_correct {
            self.score += 1;
        }
        tracing::debug!(
            "Question {} answered, correct: {}",
            question_id,
            event.is_correct
        );
        self.answer_log.push(AnswerRecord {
            question_id,
            is_correct: event.is_correct,
            detail: event.detail,
        });
        self.phase = SessionPhase::Advancing;
        self.advance.start(now, ADVANCE_DELAY);
        true
    }

    /// Drives renderer timers and the advance delay. Returns the result exactly
    /// once, when the last question has been processed.
    pub fn tick(&mut self, now: Instant) -> Option<QuizResult> {
        match self.phase {
            SessionPhase::Answering => {
                if let Some(event) = self.renderer.poll(now) {
                    self.record_answer(event, now);
                }
                None
            }
            SessionPhase::Advancing => {
                if !self.advance.fire(now) {
                    return None;
                }
                if self.current_index + 1 < self.questions.len() {
                    self.current_index += 1;
                    self.renderer = QuestionRenderer::for_question(
                        &self.questions[self.current_index],
                        &mut self.rng,
                    );
                    self.phase = SessionPhase::Answering;
                    None
                } else {
                    self.phase = SessionPhase::Complete;
                    let result = self.result();
                    tracing::info!(
                        "Quiz '{}' complete: {}/{}",
                        result.list_name,
                        result.score,
                        result.total_questions
                    );
                    Some(result)
                }
            }
            SessionPhase::Complete => None,
        }
    }

    fn result(&self) -> QuizResult {
        QuizResult {
            list_name: self.list_name.clone(),
            score: self.score,
            total_questions: self.questions.len(),
            answers: self.answer_log.clone(),
        }
    }
}

pub fn handle_quiz_input(
    session: &mut QuizSession,
    key: KeyEvent,
    app_state: &mut AppState,
    now: Instant,
) {
    match key.code {
        KeyCode::Esc => *app_state = AppState::QuizQuitConfirm,
        _ => session.handle_key(key, now),
    }
}

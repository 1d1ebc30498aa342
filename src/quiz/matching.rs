use super::timer::Delay;
use super::Renderer;
use crate::models::{AnswerDetail, AnswerEvent, MatchingPair, MatchingQuestion};
use crossterm::event::{KeyCode, KeyEvent};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub const WRONG_FLASH: Duration = Duration::from_millis(800);
pub const COMPLETE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Idle,
    Selected,
    Matched,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongAttempt {
    pub left_id: String,
    pub right_id: String,
}

#[derive(Debug)]
pub struct MatchingRenderer {
    pub question: MatchingQuestion,
    right_order: Vec<usize>,
    selected_left: Option<String>,
    selected_right: Option<String>,
    matched: BTreeSet<String>,
    wrong_attempt: Option<WrongAttempt>,
    wrong_flash: Delay,
    complete: Delay,
    completed: bool,
    emitted: bool,
    pub focus: Column,
    pub left_cursor: usize,
    pub right_cursor: usize,
}

impl MatchingRenderer {
    /// The right column is shuffled once; the left keeps backend order.
    pub fn new<R: Rng + ?Sized>(question: MatchingQuestion, rng: &mut R) -> Self {
        let mut right_order: Vec<usize> = (0..question.pairs.len()).collect();
        right_order.shuffle(rng);
        Self::with_right_order(question, right_order)
    }

    pub fn with_right_order(question: MatchingQuestion, right_order: Vec<usize>) -> Self {
        Self {
            question,
            right_order,
            selected_left: None,
            selected_right: None,
            matched: BTreeSet::new(),
            wrong_attempt: None,
            wrong_flash: Delay::idle(),
            complete: Delay::idle(),
            completed: false,
            emitted: false,
            focus: Column::Left,
            left_cursor: 0,
            right_cursor: 0,
        }
    }

    pub fn left_items(&self) -> impl Iterator<Item = &MatchingPair> {
        self.question.pairs.iter()
    }

    pub fn right_items(&self) -> impl Iterator<Item = &MatchingPair> {
        self.right_order
            .iter()
            .filter_map(|&i| self.question.pairs.get(i))
    }

    pub fn matched(&self) -> &BTreeSet<String> {
        &self.matched
    }

    pub fn selected_left(&self) -> Option<&str> {
        self.selected_left.as_deref()
    }

    pub fn selected_right(&self) -> Option<&str> {
        self.selected_right.as_deref()
    }

    pub fn wrong_attempt(&self) -> Option<&WrongAttempt> {
        self.wrong_attempt.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn accepts_input(&self, pair_id: &str) -> bool {
        !self.completed
            && !self.wrong_flash.is_pending()
            && !self.matched.contains(pair_id)
            && self.question.pairs.iter().any(|p| p.id == pair_id)
    }

    pub fn select_left(&mut self, pair_id: &str, now: Instant) -> bool {
        if !self.accepts_input(pair_id) {
            return false;
        }
        self.selected_left = toggled(self.selected_left.take(), pair_id);
        self.judge(now);
        true
    }

    pub fn select_right(&mut self, pair_id: &str, now: Instant) -> bool {
        if !self.accepts_input(pair_id) {
            return false;
        }
        self.selected_right = toggled(self.selected_right.take(), pair_id);
        self.judge(now);
        true
    }

    fn judge(&mut self, now: Instant) {
        let (Some(left), Some(right)) = (&self.selected_left, &self.selected_right) else {
            return;
        };

        if left == right {
            self.matched.insert(left.clone());
            self.selected_left = None;
            self.selected_right = None;
            if self.matched.len() == self.question.pairs.len() {
                self.completed = true;
                self.complete.start(now, COMPLETE_DELAY);
                tracing::debug!("Matching {} completed", self.question.id);
            }
        } else {
            self.wrong_attempt = Some(WrongAttempt {
                left_id: left.clone(),
                right_id: right.clone(),
            });
            self.wrong_flash.start(now, WRONG_FLASH);
        }
    }

    pub fn status(&self, column: Column, pair_id: &str) -> ItemStatus {
        if self.matched.contains(pair_id) {
            return ItemStatus::Matched;
        }
        let (wrong, selected) = match column {
            Column::Left => (
                self.wrong_attempt.as_ref().map(|w| w.left_id.as_str()),
                self.selected_left.as_deref(),
            ),
            Column::Right => (
                self.wrong_attempt.as_ref().map(|w| w.right_id.as_str()),
                self.selected_right.as_deref(),
            ),
        };
        if wrong == Some(pair_id) {
            ItemStatus::Wrong
        } else if selected == Some(pair_id) {
            ItemStatus::Selected
        } else {
            ItemStatus::Idle
        }
    }

    fn id_at_cursor(&self) -> Option<String> {
        match self.focus {
            Column::Left => self.question.pairs.get(self.left_cursor).map(|p| p.id.clone()),
            Column::Right => self
                .right_order
                .get(self.right_cursor)
                .and_then(|&i| self.question.pairs.get(i))
                .map(|p| p.id.clone()),
        }
    }
}

fn toggled(current: Option<String>, pair_id: &str) -> Option<String> {
    match current {
        Some(id) if id == pair_id => None,
        _ => Some(pair_id.to_string()),
    }
}

impl Renderer for MatchingRenderer {
    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if self.completed {
            return;
        }
        let len = self.question.pairs.len();
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Column::Left => Column::Right,
                    Column::Right => Column::Left,
                };
            }
            KeyCode::Left => self.focus = Column::Left,
            KeyCode::Right => self.focus = Column::Right,
            KeyCode::Up => {
                let cursor = match self.focus {
                    Column::Left => &mut self.left_cursor,
                    Column::Right => &mut self.right_cursor,
                };
                *cursor = cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                let cursor = match self.focus {
                    Column::Left => &mut self.left_cursor,
                    Column::Right => &mut self.right_cursor,
                };
                if *cursor + 1 < len {
                    *cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.id_at_cursor() {
                    match self.focus {
                        Column::Left => self.select_left(&id, now),
                        Column::Right => self.select_right(&id, now),
                    };
                }
            }
            _ => {}
        }
    }

    fn poll(&mut self, now: Instant) -> Option<AnswerEvent> {
        if self.wrong_flash.fire(now) {
            self.wrong_attempt = None;
            self.selected_left = None;
            self.selected_right = None;
        }
        if self.emitted || !self.complete.fire(now) {
            return None;
        }
        self.emitted = true;
        Some(AnswerEvent {
            is_correct: true,
            detail: AnswerDetail::Matched(self.matched.clone()),
        })
    }

    fn is_finished(&self) -> bool {
        self.emitted
    }
}

use super::timer::Delay;
use super::Renderer;
use crate::models::{AnswerDetail, AnswerEvent, MultipleChoiceQuestion};
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub const REVEAL_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    Idle,
    Selected,
    Correct,
    Wrong,
}

#[derive(Debug)]
pub struct MultipleChoiceRenderer {
    pub question: MultipleChoiceQuestion,
    selected: BTreeSet<String>,
    pub cursor: usize,
    submitted: bool,
    reveal: Delay,
    emitted: bool,
}

impl MultipleChoiceRenderer {
    pub fn new(question: MultipleChoiceQuestion) -> Self {
        Self {
            question,
            selected: BTreeSet::new(),
            cursor: 0,
            submitted: false,
            reveal: Delay::idle(),
            emitted: false,
        }
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Returns whether the selection changed.
    pub fn toggle(&mut self, option_id: &str) -> bool {
        if self.submitted || !self.question.options.iter().any(|o| o.id == option_id) {
            return false;
        }

        if self.question.allow_multiple {
            if !self.selected.remove(option_id) {
                self.selected.insert(option_id.to_string());
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(option_id) {
                return false;
            }
            self.selected.clear();
            self.selected.insert(option_id.to_string());
        }
        true
    }

    pub fn can_submit(&self) -> bool {
        !self.submitted && !self.selected.is_empty()
    }

    /// Freezes input and schedules the answer event.
    pub fn submit(&mut self, now: Instant) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.submitted = true;
        self.reveal.start(now, REVEAL_DELAY);
        tracing::debug!(
            "Multiple choice {} submitted with {:?}",
            self.question.id,
            self.selected
        );
        true
    }

    pub fn is_correct_selection(&self) -> bool {
        self.selected == self.question.correct_ids
    }

    pub fn option_status(&self, option_id: &str) -> OptionStatus {
        let is_selected = self.selected.contains(option_id);
        if !self.submitted {
            return if is_selected {
                OptionStatus::Selected
            } else {
                OptionStatus::Idle
            };
        }
        if self.question.is_correct_option(option_id) {
            OptionStatus::Correct
        } else if is_selected {
            OptionStatus::Wrong
        } else {
            OptionStatus::Idle
        }
    }

    fn toggle_at(&mut self, index: usize) {
        if let Some(option) = self.question.options.get(index) {
            let id = option.id.clone();
            self.cursor = index;
            self.toggle(&id);
        }
    }
}

impl Renderer for MultipleChoiceRenderer {
    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if self.submitted {
            return;
        }
        match key.code {
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.cursor + 1 < self.question.options.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle_at(self.cursor),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c as usize - '1' as usize;
                self.toggle_at(index);
            }
            KeyCode::Enter => {
                self.submit(now);
            }
            _ => {}
        }
    }

    fn poll(&mut self, now: Instant) -> Option<AnswerEvent> {
        if self.emitted || !self.reveal.fire(now) {
            return None;
        }
        self.emitted = true;
        Some(AnswerEvent {
            is_correct: self.is_correct_selection(),
            detail: AnswerDetail::Selected(self.selected.clone()),
        })
    }

    fn is_finished(&self) -> bool {
        self.emitted
    }
}

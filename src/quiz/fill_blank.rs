use super::timer::Delay;
use super::Renderer;
use crate::models::{AnswerDetail, AnswerEvent, FillBlankQuestion};
use crossterm::event::{KeyCode, KeyEvent};
use std::time::{Duration, Instant};

pub const REVEAL_DELAY: Duration = Duration::from_millis(1000);
/// Four 50ms shake steps.
pub const SHAKE_DURATION: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Accepted,
    Rejected,
    Ignored,
}

#[derive(Debug)]
pub struct FillBlankRenderer {
    pub question: FillBlankQuestion,
    answer: Vec<char>,
    entered: Vec<char>,
    /// Pool slots in the order they were consumed; backspace pops from here.
    consumed: Vec<usize>,
    available: Vec<Option<char>>,
    pub cursor: usize,
    completed: bool,
    wrong_slot: Option<usize>,
    shake: Delay,
    reveal: Delay,
    emitted: bool,
}

impl FillBlankRenderer {
    pub fn new(question: FillBlankQuestion) -> Self {
        let answer = question.answer.chars().collect();
        let available = question.letter_pool.iter().copied().map(Some).collect();
        Self {
            question,
            answer,
            entered: Vec::new(),
            consumed: Vec::new(),
            available,
            cursor: 0,
            completed: false,
            wrong_slot: None,
            shake: Delay::idle(),
            reveal: Delay::idle(),
            emitted: false,
        }
    }

    pub fn entered(&self) -> &[char] {
        &self.entered
    }

    pub fn entered_text(&self) -> String {
        self.entered.iter().collect()
    }

    pub fn available(&self) -> &[Option<char>] {
        &self.available
    }

    pub fn wrong_slot(&self) -> Option<usize> {
        self.wrong_slot
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_correct(&self) -> bool {
        self.entered == self.answer
    }

    /// Letters still on offer, sorted.
    pub fn available_letters(&self) -> Vec<char> {
        let mut letters: Vec<char> = self.available.iter().flatten().copied().collect();
        letters.sort_unstable();
        letters
    }

    /// Taps pool slot `index`. Only the next letter of the answer is accepted.
    pub fn tap(&mut self, index: usize, now: Instant) -> TapOutcome {
        if self.completed {
            return TapOutcome::Ignored;
        }
        let Some(Some(letter)) = self.available.get(index).copied() else {
            return TapOutcome::Ignored;
        };
        let Some(expected) = self.answer.get(self.entered.len()).copied() else {
            return TapOutcome::Ignored;
        };

        if letter != expected {
            self.wrong_slot = Some(index);
            self.shake.start(now, SHAKE_DURATION);
            return TapOutcome::Rejected;
        }

        self.available[index] = None;
        self.entered.push(letter);
        self.consumed.push(index);
        self.wrong_slot = None;
        self.shake.cancel();

        if self.entered.len() == self.answer.len() {
            self.completed = true;
            self.reveal.start(now, REVEAL_DELAY);
            tracing::debug!(
                "Fill blank {} completed with {}",
                self.question.id,
                self.entered_text()
            );
        }
        TapOutcome::Accepted
    }

    /// Taps the first open slot holding `letter` (case-insensitive).
    pub fn type_letter(&mut self, letter: char, now: Instant) -> TapOutcome {
        let wanted: Vec<char> = letter.to_uppercase().collect();
        let slot = self
            .available
            .iter()
            .position(|slot| slot.is_some_and(|c| wanted.len() == 1 && c == wanted[0]));
        match slot {
            Some(index) => {
                self.cursor = index;
                self.tap(index, now)
            }
            None => TapOutcome::Ignored,
        }
    }

    /// Removes the last letter and reopens exactly the slot it came from.
    pub fn backspace(&mut self) -> bool {
        if self.completed {
            return false;
        }
        let Some(slot) = self.consumed.pop() else {
            return false;
        };
        self.entered.pop();
        self.available[slot] = self.question.letter_pool.get(slot).copied();
        true
    }
}

impl Renderer for FillBlankRenderer {
    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if self.completed {
            return;
        }
        match key.code {
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor + 1 < self.available.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.tap(self.cursor, now);
            }
            KeyCode::Backspace => {
                self.backspace();
            }
            KeyCode::Char(c) if c.is_alphabetic() => {
                self.type_letter(c, now);
            }
            _ => {}
        }
    }

    fn poll(&mut self, now: Instant) -> Option<AnswerEvent> {
        if self.shake.fire(now) {
            self.wrong_slot = None;
        }
        if self.emitted || !self.reveal.fire(now) {
            return None;
        }
        self.emitted = true;
        Some(AnswerEvent {
            is_correct: self.is_correct(),
            detail: AnswerDetail::Typed(self.entered_text()),
        })
    }

    fn is_finished(&self) -> bool {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    /// "HAPPY" with pool H P A Y P X L M.
    fn happy() -> FillBlankRenderer {
        FillBlankRenderer::new(
            FillBlankQuestion::new(
                "q_2",
                "I am very _____ today.",
                "HAPPY",
                vec!['H', 'P', 'A', 'Y', 'P', 'X', 'L', 'M'],
                "Mutlu",
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_out_of_order_letter_rejected() {
        let mut r = happy();
        let now = Instant::now();

        // second P (slot 4) before H
        assert_eq!(r.tap(4, now), TapOutcome::Rejected);
        assert!(r.entered().is_empty());
        assert_eq!(r.wrong_slot(), Some(4));
        assert_eq!(r.available()[4], Some('P'));
    }

    #[test]
    fn test_shake_clears_after_duration() {
        let mut r = happy();
        let now = Instant::now();
        r.tap(1, now);
        assert!(r.poll(now + Duration::from_millis(100)).is_none());
        assert_eq!(r.wrong_slot(), Some(1));
        r.poll(now + SHAKE_DURATION);
        assert_eq!(r.wrong_slot(), None);
    }

    #[test]
    fn test_in_order_letters_accepted_and_consumed() {
        let mut r = happy();
        let now = Instant::now();
        assert_eq!(r.tap(0, now), TapOutcome::Accepted);
        assert_eq!(r.tap(2, now), TapOutcome::Accepted);
        assert_eq!(r.entered_text(), "HA");
        assert_eq!(r.available()[0], None);
        assert_eq!(r.tap(0, now), TapOutcome::Ignored);
    }

    #[test]
    fn test_backspace_restores_consumed_slot() {
        let mut r = happy();
        let now = Instant::now();
        r.tap(0, now);
        r.tap(2, now);
        r.tap(4, now); // second P
        let before_last = {
            let mut probe = happy();
            probe.tap(0, now);
            probe.tap(2, now);
            probe.available_letters()
        };

        assert!(r.backspace());
        assert_eq!(r.entered_text(), "HA");
        assert_eq!(r.available()[4], Some('P'));
        assert_eq!(r.available()[1], Some('P'));
        assert_eq!(r.available_letters(), before_last);
    }

    #[test]
    fn test_backspace_with_duplicates_tracks_slot_identity() {
        let mut r = happy();
        let now = Instant::now();
        for slot in [0, 2, 4, 1] {
            assert_eq!(r.tap(slot, now), TapOutcome::Accepted);
        }
        // both P slots consumed; last tap took slot 1
        assert!(r.backspace());
        assert_eq!(r.available()[1], Some('P'));
        assert_eq!(r.available()[4], None);
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut r = happy();
        assert!(!r.backspace());
    }

    #[test]
    fn test_completion_emits_after_reveal() {
        let mut r = happy();
        let now = Instant::now();
        for c in "happy".chars() {
            assert_eq!(r.type_letter(c, now), TapOutcome::Accepted);
        }
        assert!(r.is_completed());
        assert!(!r.backspace());
        assert!(r.poll(now + Duration::from_millis(999)).is_none());

        let event = r.poll(now + REVEAL_DELAY).unwrap();
        assert!(event.is_correct);
        assert_eq!(event.detail, AnswerDetail::Typed("HAPPY".to_string()));
        assert!(r.poll(now + Duration::from_secs(3)).is_none());
    }

    #[test]
    fn test_type_letter_not_in_pool_ignored() {
        let mut r = happy();
        assert_eq!(r.type_letter('z', Instant::now()), TapOutcome::Ignored);
    }

    #[test]
    fn test_input_ignored_after_completion() {
        let mut r = happy();
        let now = Instant::now();
        for c in "HAPPY".chars() {
            r.type_letter(c, now);
        }
        r.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE), now);
        assert_eq!(r.entered_text(), "HAPPY");
        assert_eq!(r.tap(5, now), TapOutcome::Ignored);
    }

    #[test]
    fn test_keyboard_cursor_tap() {
        let mut r = happy();
        let now = Instant::now();
        r.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), now);
        assert_eq!(r.entered_text(), "H");
        r.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE), now);
        r.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), now);
        assert_eq!(r.wrong_slot(), Some(1));
        assert_eq!(r.entered_text(), "H");
    }
}

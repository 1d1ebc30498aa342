pub mod fill_blank;
pub mod matching;
pub mod multiple_choice;
pub mod timer;

pub use fill_blank::{FillBlankRenderer, TapOutcome};
pub use matching::{Column, ItemStatus, MatchingRenderer};
pub use multiple_choice::{MultipleChoiceRenderer, OptionStatus};
pub use timer::Delay;

use crate::models::{AnswerEvent, Question};
use crossterm::event::KeyEvent;
use rand::Rng;
use std::time::Instant;

/// Collects and judges the answer to one question.
///
/// `poll` yields the answer event at most once; after that the renderer ignores
/// all input.
pub trait Renderer {
    fn handle_key(&mut self, key: KeyEvent, now: Instant);
    fn poll(&mut self, now: Instant) -> Option<AnswerEvent>;
    fn is_finished(&self) -> bool;
}

#[derive(Debug)]
pub enum QuestionRenderer {
    MultipleChoice(MultipleChoiceRenderer),
    FillBlank(FillBlankRenderer),
    Matching(MatchingRenderer),
}

impl QuestionRenderer {
    pub fn for_question<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        match question {
            Question::MultipleChoice(q) => {
                QuestionRenderer::MultipleChoice(MultipleChoiceRenderer::new(q.clone()))
            }
            Question::FillBlank(q) => QuestionRenderer::FillBlank(FillBlankRenderer::new(q.clone())),
            Question::Matching(q) => {
                QuestionRenderer::Matching(MatchingRenderer::new(q.clone(), rng))
            }
        }
    }

    fn inner(&mut self) -> &mut dyn Renderer {
        match self {
            QuestionRenderer::MultipleChoice(r) => r,
            QuestionRenderer::FillBlank(r) => r,
            QuestionRenderer::Matching(r) => r,
        }
    }
}

impl Renderer for QuestionRenderer {
    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        self.inner().handle_key(key, now)
    }

    fn poll(&mut self, now: Instant) -> Option<AnswerEvent> {
        self.inner().poll(now)
    }

    fn is_finished(&self) -> bool {
        match self {
            QuestionRenderer::MultipleChoice(r) => r.is_finished(),
            QuestionRenderer::FillBlank(r) => r.is_finished(),
            QuestionRenderer::Matching(r) => r.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchingPair, MatchingQuestion};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_dispatch_picks_matching_renderer() {
        let question = Question::Matching(
            MatchingQuestion::new(
                "q_1",
                vec![MatchingPair {
                    id: "pair_0".to_string(),
                    left: "big".to_string(),
                    right: "large".to_string(),
                }],
            )
            .unwrap(),
        );
        let mut rng = StdRng::seed_from_u64(1);
        let renderer = QuestionRenderer::for_question(&question, &mut rng);
        assert!(matches!(renderer, QuestionRenderer::Matching(_)));
        assert!(!renderer.is_finished());
    }
}

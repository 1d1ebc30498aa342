//! Conversion of backend quiz payloads into playable questions.

use crate::api::dto::{OptionDto, QuestionDto};
use crate::models::{
    BLANK_MARKER, ChoiceOption, FillBlankQuestion, MatchingPair, MatchingQuestion,
    MultipleChoiceQuestion, Question,
};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MIN_DISTRACTORS: usize = 2;
const MAX_QUESTIONS: usize = 50;
const DEFAULT_PROMPT: &str = "Question";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendKind {
    MultipleChoice,
    FillBlank,
    Matching,
}

impl BackendKind {
    fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::to_ascii_uppercase).as_deref() {
            Some("SYNONYM_MATCHING") => BackendKind::Matching,
            Some("FILL_IN_THE_BLANK") => BackendKind::FillBlank,
            _ => BackendKind::MultipleChoice,
        }
    }
}

/// Largest question count worth asking for, given the list size.
pub fn max_question_count(word_count: usize) -> usize {
    word_count.saturating_mul(2).min(MAX_QUESTIONS)
}

/// Formats every payload, drops the ones that cannot be judged, then keeps at
/// most `requested` of the survivors in backend order.
pub fn format_questions<R: Rng + ?Sized>(
    backend: &[QuestionDto],
    requested: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut questions: Vec<Question> = backend
        .iter()
        .enumerate()
        .filter_map(|(index, dto)| format_question(dto, index, rng))
        .collect();

    let dropped = backend.len() - questions.len();
    if dropped > 0 {
        tracing::warn!(
            "Dropped {} of {} backend questions that could not be judged",
            dropped,
            backend.len()
        );
    }

    questions.truncate(requested);
    questions
}

pub fn format_question<R: Rng + ?Sized>(
    dto: &QuestionDto,
    index: usize,
    rng: &mut R,
) -> Option<Question> {
    let id = match dto.question_id {
        Some(question_id) => format!("q_{}", question_id),
        None => format!("q_{}", index),
    };

    let question = match BackendKind::from_tag(dto.question_type.as_deref()) {
        BackendKind::MultipleChoice => multiple_choice(id, dto).map(Question::MultipleChoice),
        BackendKind::FillBlank => fill_blank(id, dto, rng).map(Question::FillBlank),
        BackendKind::Matching => matching(id, dto).map(Question::Matching),
    };
    if question.is_none() {
        tracing::debug!(
            "Skipping backend question {} ({:?})",
            index,
            dto.question_type
        );
    }
    question
}

fn correct_writings(dto: &QuestionDto) -> &[String] {
    dto.correct_answer_writings.as_deref().unwrap_or_default()
}

fn multiple_choice(id: String, dto: &QuestionDto) -> Option<MultipleChoiceQuestion> {
    let correct = correct_writings(dto);
    let mut correct_ids = BTreeSet::new();
    let options: Vec<ChoiceOption> = dto
        .options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let option_id = format!("opt_{}", i);
            if opt
                .writing
                .as_ref()
                .is_some_and(|w| correct.iter().any(|c| c == w))
            {
                correct_ids.insert(option_id.clone());
            }
            ChoiceOption {
                id: option_id,
                text: option_text(opt, i),
            }
        })
        .collect();

    let prompt = non_empty(dto.question_sentence.as_deref()).unwrap_or(DEFAULT_PROMPT);
    MultipleChoiceQuestion::new(id, prompt, options, correct_ids)
}

fn option_text(opt: &OptionDto, index: usize) -> String {
    non_empty(opt.meaning_tr.as_deref())
        .or_else(|| non_empty(opt.writing.as_deref()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Option {}", index + 1))
}

fn fill_blank<R: Rng + ?Sized>(
    id: String,
    dto: &QuestionDto,
    rng: &mut R,
) -> Option<FillBlankQuestion> {
    let answer: String = correct_writings(dto)
        .first()?
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let sentence = non_empty(dto.question_sentence.as_deref())?;
    if answer.is_empty() || !sentence.contains(BLANK_MARKER) {
        return None;
    }

    let mut letter_pool: Vec<char> = answer.chars().collect();
    let mut distractors: Vec<char> = ALPHABET
        .chars()
        .filter(|c| !letter_pool.contains(c))
        .collect();
    distractors.shuffle(rng);
    distractors.truncate(letter_pool.len().max(MIN_DISTRACTORS));
    letter_pool.extend(distractors);
    letter_pool.shuffle(rng);

    let hint = dto
        .options
        .first()
        .and_then(|opt| {
            non_empty(opt.meaning_tr.as_deref()).or_else(|| non_empty(opt.meaning_en.as_deref()))
        })
        .unwrap_or_default();

    FillBlankQuestion::new(id, sentence, answer, letter_pool, hint)
}

/// Options pair up by consecutive index; a trailing odd option is ignored.
fn matching(id: String, dto: &QuestionDto) -> Option<MatchingQuestion> {
    let mut pairs = Vec::new();
    for chunk in dto.options.chunks_exact(2) {
        let (Some(left), Some(right)) = (
            non_empty(chunk[0].writing.as_deref()),
            non_empty(chunk[1].writing.as_deref()),
        ) else {
            continue;
        };
        pairs.push(MatchingPair {
            id: format!("pair_{}", pairs.len()),
            left: left.to_string(),
            right: right.to_string(),
        });
    }
    MatchingQuestion::new(id, pairs)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{MultipleChoiceRenderer, Renderer};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Instant;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(3)
    }

    fn opt(writing: &str, meaning_tr: &str) -> OptionDto {
        OptionDto {
            writing: Some(writing.to_string()),
            meaning_tr: Some(meaning_tr.to_string()),
            meaning_en: None,
        }
    }

    fn mc_dto(id: i64) -> QuestionDto {
        QuestionDto {
            question_id: Some(id),
            question_type: Some("MULTIPLE_CHOICE".to_string()),
            question_sentence: Some("What does \"happy\" mean?".to_string()),
            options: vec![
                opt("happy", "Mutlu"),
                opt("sad", "Üzgün"),
                opt("angry", "Kızgın"),
                opt("tired", "Yorgun"),
            ],
            correct_answer_writings: Some(vec!["happy".to_string()]),
        }
    }

    fn fill_dto(id: i64, answer: Option<&str>) -> QuestionDto {
        QuestionDto {
            question_id: Some(id),
            question_type: Some("fill_in_the_blank".to_string()),
            question_sentence: Some("I am very _____ today.".to_string()),
            options: vec![opt("happy", "Mutlu")],
            correct_answer_writings: answer.map(|a| vec![a.to_string()]),
        }
    }

    fn matching_dto(options: Vec<OptionDto>) -> QuestionDto {
        QuestionDto {
            question_id: Some(9),
            question_type: Some("Synonym_Matching".to_string()),
            question_sentence: None,
            options,
            correct_answer_writings: None,
        }
    }

    #[test]
    fn test_max_question_count() {
        assert_eq!(max_question_count(0), 0);
        assert_eq!(max_question_count(3), 6);
        assert_eq!(max_question_count(40), 50);
    }

    #[test]
    fn test_multiple_choice_round_trip_marks_correct_option() {
        let question = format_question(&mc_dto(1), 0, &mut rng()).unwrap();
        let Question::MultipleChoice(mc) = question else {
            panic!("expected multiple choice");
        };
        assert_eq!(mc.id, "q_1");
        assert_eq!(mc.options[0].text, "Mutlu");
        assert!(!mc.allow_multiple);

        let mut renderer = MultipleChoiceRenderer::new(mc);
        let now = Instant::now();
        renderer.toggle("opt_0");
        renderer.submit(now);
        let event = renderer
            .poll(now + crate::quiz::multiple_choice::REVEAL_DELAY)
            .unwrap();
        assert!(event.is_correct);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_multiple_choice() {
        let mut dto = mc_dto(4);
        dto.question_type = Some("TRUE_FALSE".to_string());
        let question = format_question(&dto, 0, &mut rng()).unwrap();
        assert!(matches!(question, Question::MultipleChoice(_)));

        dto.question_type = None;
        let question = format_question(&dto, 0, &mut rng()).unwrap();
        assert!(matches!(question, Question::MultipleChoice(_)));
    }

    #[test]
    fn test_multiple_choice_without_correct_option_dropped() {
        let mut dto = mc_dto(1);
        dto.correct_answer_writings = Some(vec!["elated".to_string()]);
        assert!(format_question(&dto, 0, &mut rng()).is_none());

        dto.options.clear();
        dto.correct_answer_writings = Some(vec!["happy".to_string()]);
        assert!(format_question(&dto, 0, &mut rng()).is_none());
    }

    #[test]
    fn test_option_text_fallbacks() {
        let mut dto = mc_dto(1);
        dto.options = vec![
            OptionDto {
                writing: Some("happy".to_string()),
                ..Default::default()
            },
            OptionDto::default(),
        ];
        let Some(Question::MultipleChoice(mc)) = format_question(&dto, 0, &mut rng()) else {
            panic!("expected multiple choice");
        };
        assert_eq!(mc.options[0].text, "happy");
        assert_eq!(mc.options[1].text, "Option 2");
    }

    #[test]
    fn test_missing_question_id_uses_index() {
        let mut dto = mc_dto(1);
        dto.question_id = None;
        let question = format_question(&dto, 5, &mut rng()).unwrap();
        assert_eq!(question.id(), "q_5");
    }

    #[test]
    fn test_fill_blank_pool_and_hint() {
        let Some(Question::FillBlank(q)) = format_question(&fill_dto(2, Some("happy")), 0, &mut rng())
        else {
            panic!("expected fill blank");
        };
        assert_eq!(q.answer, "HAPPY");
        assert_eq!(q.hint, "Mutlu");
        // answer letters plus max(2, 5) distractors
        assert_eq!(q.letter_pool.len(), 10);
        let distractors: Vec<char> = q
            .letter_pool
            .iter()
            .copied()
            .filter(|c| !"HAPY".contains(*c))
            .collect();
        assert_eq!(distractors.len(), 5);
        assert!(distractors.iter().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fill_blank_short_answer_gets_two_distractors() {
        let Some(Question::FillBlank(q)) = format_question(&fill_dto(2, Some("a")), 0, &mut rng())
        else {
            panic!("expected fill blank");
        };
        assert_eq!(q.letter_pool.len(), 3);
    }

    #[test]
    fn test_fill_blank_answer_whitespace_removed() {
        let Some(Question::FillBlank(q)) =
            format_question(&fill_dto(2, Some("ice cream")), 0, &mut rng())
        else {
            panic!("expected fill blank");
        };
        assert_eq!(q.answer, "ICECREAM");
    }

    #[test]
    fn test_fill_blank_without_marker_or_answer_dropped() {
        assert!(format_question(&fill_dto(2, None), 0, &mut rng()).is_none());
        assert!(format_question(&fill_dto(2, Some("")), 0, &mut rng()).is_none());

        let mut dto = fill_dto(2, Some("happy"));
        dto.question_sentence = Some("I am very happy today.".to_string());
        assert!(format_question(&dto, 0, &mut rng()).is_none());
    }

    #[test]
    fn test_matching_pairs_consecutive_options() {
        let dto = matching_dto(vec![
            opt("big", ""),
            opt("large", ""),
            opt("", ""),
            opt("tiny", ""),
            opt("quick", ""),
            opt("fast", ""),
            opt("odd", ""),
        ]);
        let Some(Question::Matching(q)) = format_question(&dto, 0, &mut rng()) else {
            panic!("expected matching");
        };
        let pairs: Vec<(&str, &str, &str)> = q
            .pairs
            .iter()
            .map(|p| (p.id.as_str(), p.left.as_str(), p.right.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("pair_0", "big", "large"), ("pair_1", "quick", "fast")]
        );
    }

    #[test]
    fn test_matching_without_pairs_dropped() {
        assert!(format_question(&matching_dto(vec![opt("big", "")]), 0, &mut rng()).is_none());
        assert!(
            format_question(&matching_dto(vec![opt("", ""), opt("x", "")]), 0, &mut rng())
                .is_none()
        );
    }

    #[test]
    fn test_invalid_payload_dropped_and_count_clamped() {
        let backend = vec![mc_dto(1), fill_dto(2, None), fill_dto(3, Some("happy"))];
        let questions = format_questions(&backend, 5, &mut rng());
        let ids: Vec<&str> = questions.iter().map(Question::id).collect();
        assert_eq!(ids, vec!["q_1", "q_3"]);
    }

    #[test]
    fn test_requested_count_limits_valid_questions() {
        let backend = vec![mc_dto(1), fill_dto(2, None), mc_dto(3), mc_dto(4)];
        let questions = format_questions(&backend, 2, &mut rng());
        let ids: Vec<&str> = questions.iter().map(Question::id).collect();
        assert_eq!(ids, vec!["q_1", "q_3"]);
    }
}

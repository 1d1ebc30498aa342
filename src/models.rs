use crate::api::dto::{WordDto, WordListDto};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Placeholder the backend puts where the missing word goes.
pub const BLANK_MARKER: &str = "_____";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoiceQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
    pub correct_ids: BTreeSet<String>,
    pub allow_multiple: bool,
}

impl MultipleChoiceQuestion {
    /// Returns `None` unless `correct_ids` is a non-empty subset of the option ids.
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<ChoiceOption>,
        correct_ids: BTreeSet<String>,
    ) -> Option<Self> {
        if options.is_empty() || correct_ids.is_empty() {
            return None;
        }
        let known: HashSet<&str> = options.iter().map(|o| o.id.as_str()).collect();
        if known.len() != options.len() || !correct_ids.iter().all(|c| known.contains(c.as_str()))
        {
            return None;
        }
        let allow_multiple = correct_ids.len() > 1;
        Some(Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
            correct_ids,
            allow_multiple,
        })
    }

    pub fn is_correct_option(&self, option_id: &str) -> bool {
        self.correct_ids.contains(option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillBlankQuestion {
    pub id: String,
    pub sentence: String,
    pub answer: String,
    pub letter_pool: Vec<char>,
    pub hint: String,
}

impl FillBlankQuestion {
    /// Returns `None` if the sentence does not hold exactly one blank marker or the
    /// pool cannot spell the answer.
    pub fn new(
        id: impl Into<String>,
        sentence: impl Into<String>,
        answer: impl Into<String>,
        letter_pool: Vec<char>,
        hint: impl Into<String>,
    ) -> Option<Self> {
        let sentence = sentence.into();
        let answer = answer.into();
        if answer.is_empty() || sentence.matches(BLANK_MARKER).count() != 1 {
            return None;
        }
        if !answer.chars().all(|c| letter_pool.contains(&c)) {
            return None;
        }
        Some(Self {
            id: id.into(),
            sentence,
            answer,
            letter_pool,
            hint: hint.into(),
        })
    }

    pub fn answer_len(&self) -> usize {
        self.answer.chars().count()
    }

    /// Text before and after the blank.
    pub fn sentence_parts(&self) -> (&str, &str) {
        self.sentence
            .split_once(BLANK_MARKER)
            .unwrap_or((self.sentence.as_str(), ""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingPair {
    pub id: String,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingQuestion {
    pub id: String,
    pub pairs: Vec<MatchingPair>,
}

impl MatchingQuestion {
    pub fn new(id: impl Into<String>, pairs: Vec<MatchingPair>) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }
        let unique: HashSet<&str> = pairs.iter().map(|p| p.id.as_str()).collect();
        if unique.len() != pairs.len() {
            return None;
        }
        Some(Self {
            id: id.into(),
            pairs,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    MultipleChoice(MultipleChoiceQuestion),
    FillBlank(FillBlankQuestion),
    Matching(MatchingQuestion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice,
    FillBlank,
    Matching,
}

impl QuestionKind {
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "Multiple Choice",
            QuestionKind::FillBlank => "Fill in the Blank",
            QuestionKind::Matching => "Matching",
        }
    }
}

impl Question {
    pub fn id(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.id,
            Question::FillBlank(q) => &q.id,
            Question::Matching(q) => &q.id,
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::MultipleChoice(_) => QuestionKind::MultipleChoice,
            Question::FillBlank(_) => QuestionKind::FillBlank,
            Question::Matching(_) => QuestionKind::Matching,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerDetail {
    Selected(BTreeSet<String>),
    Typed(String),
    Matched(BTreeSet<String>),
}

/// The one signal a renderer emits per question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEvent {
    pub is_correct: bool,
    pub detail: AnswerDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: String,
    pub is_correct: bool,
    pub detail: AnswerDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub list_name: String,
    pub score: usize,
    pub total_questions: usize,
    pub answers: Vec<AnswerRecord>,
}

impl QuizResult {
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        ((self.score as f64 / self.total_questions as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub english: String,
    pub turkish: String,
    pub meaning_en: String,
    pub part_of_speech: String,
    pub example: String,
    pub example_tr: String,
}

impl From<WordDto> for Word {
    fn from(dto: WordDto) -> Self {
        Self {
            id: dto.id.map(|id| id.to_string()).unwrap_or_default(),
            english: dto.word_writing.or(dto.word).unwrap_or_default(),
            turkish: dto.meaning_tr.unwrap_or_default(),
            meaning_en: dto.meaning_en.unwrap_or_default(),
            part_of_speech: dto.part_of_speech.unwrap_or_default(),
            example: dto.example_sentence_en.unwrap_or_default(),
            example_tr: dto.example_sentence_tr.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    pub id: i64,
    pub name: String,
    pub words: Vec<Word>,
}

impl WordList {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

impl From<WordListDto> for WordList {
    fn from(dto: WordListDto) -> Self {
        Self {
            id: dto.word_list_id,
            name: dto.name.unwrap_or_default(),
            words: dto.words.into_iter().map(Word::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Login,
    Menu,
    QuizSetup,
    Quiz,
    QuizQuitConfirm,
    Summary,
    Reader,
}

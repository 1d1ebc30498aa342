//! Reading mode: tokenised documents and word capture with sentence context.

use crate::api::dto::AddWordRequest;
use crate::api_worker::ApiRequest;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const SAMPLE_TITLE: &str = "Sample text";

pub const SAMPLE_TEXT: &str = "Welcome to the Reader Mode! This is a sample text to demonstrate the word selection feature.

Select any word to add it to your vocabulary list. The sentence containing the word will also be saved for context.

You can open your own PDF files or plain text files to read and learn new words.

Learning vocabulary in context is one of the most effective ways to remember new words. When you see a word used in a real sentence, you understand not just its meaning but also how it is used.

Happy reading and learning!";

const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}', '«', '»', '“', '”',
    '‘', '’', '–', '—',
];
const MIN_WORD_CHARS: usize = 2;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\S+").expect("valid token regex"))
}

fn sentence_end_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"))
}

fn paragraph_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid paragraph regex"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Text with surrounding punctuation removed.
    pub word: String,
    pub paragraph: usize,
    start: usize,
    lead: usize,
}

impl Token {
    pub fn is_selectable(&self) -> bool {
        self.word.chars().count() >= MIN_WORD_CHARS
    }
}

/// What gets sent when a word is added to a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSelection {
    pub word: String,
    pub sentence: String,
    /// Char offset of the word within `sentence`.
    pub word_start_index: usize,
    pub word_length: usize,
}

impl WordSelection {
    pub fn to_request(&self) -> AddWordRequest {
        let sentence = if self.sentence.is_empty() {
            self.word.clone()
        } else {
            self.sentence.clone()
        };
        AddWordRequest {
            sentence,
            word_start_index: self.word_start_index,
            word_length: self.word_length,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReaderDocument {
    pub title: String,
    text: String,
    tokens: Vec<Token>,
    /// Byte ranges of sentences, untrimmed.
    sentences: Vec<(usize, usize)>,
}

impl ReaderDocument {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let breaks: Vec<usize> = paragraph_break_regex()
            .find_iter(&text)
            .map(|m| m.start())
            .collect();

        let tokens = token_regex()
            .find_iter(&text)
            .map(|m| {
                let raw = m.as_str();
                let trimmed_start = raw.trim_start_matches(PUNCTUATION);
                let word = trimmed_start.trim_end_matches(PUNCTUATION).to_string();
                Token {
                    text: raw.to_string(),
                    word,
                    paragraph: breaks.iter().filter(|&&b| b < m.start()).count(),
                    start: m.start(),
                    lead: raw.len() - trimmed_start.len(),
                }
            })
            .collect();

        let mut sentences = Vec::new();
        let mut start = 0;
        for m in sentence_end_regex().find_iter(&text) {
            // the terminator is a single ASCII byte
            sentences.push((start, m.start() + 1));
            start = m.end();
        }
        if start < text.len() {
            sentences.push((start, text.len()));
        }

        Self {
            title: title.into(),
            text,
            tokens,
            sentences,
        }
    }

    pub fn sample() -> Self {
        Self::new(SAMPLE_TITLE, SAMPLE_TEXT)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn paragraph_count(&self) -> usize {
        self.tokens.last().map_or(0, |t| t.paragraph + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Selection for the token at `index`, or `None` if it is too short to be a word.
    pub fn selection(&self, index: usize) -> Option<WordSelection> {
        let token = self.tokens.get(index).filter(|t| t.is_selectable())?;
        let word_byte = token.start + token.lead;

        let (sentence, word_start_index) = match self
            .sentences
            .iter()
            .find(|(s, e)| *s <= token.start && token.start < *e)
        {
            Some(&(s, e)) => {
                let raw = &self.text[s..e];
                let leading = raw.len() - raw.trim_start().len();
                let sentence = raw.trim().to_string();
                let offset = self.text[s + leading..word_byte].chars().count();
                (sentence, offset)
            }
            None => (String::new(), 0),
        };

        Some(WordSelection {
            word: token.word.clone(),
            sentence,
            word_start_index,
            word_length: token.word.chars().count(),
        })
    }

    pub fn next_selectable(&self, from: usize) -> Option<usize> {
        (from + 1..self.tokens.len()).find(|&i| self.tokens[i].is_selectable())
    }

    pub fn prev_selectable(&self, from: usize) -> Option<usize> {
        (0..from.min(self.tokens.len()))
            .rev()
            .find(|&i| self.tokens[i].is_selectable())
    }

    pub fn first_selectable(&self) -> Option<usize> {
        self.tokens.iter().position(Token::is_selectable)
    }
}

/// Where reader text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Sample,
    TextFile(PathBuf),
    Pdf(PathBuf),
}

impl DocumentSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            DocumentSource::Pdf(path)
        } else {
            DocumentSource::TextFile(path)
        }
    }

    pub fn title(&self) -> String {
        match self {
            DocumentSource::Sample => SAMPLE_TITLE.to_string(),
            DocumentSource::TextFile(path) | DocumentSource::Pdf(path) => file_title(path),
        }
    }

    /// Background request that loads this source; the sample needs none.
    pub fn request(&self) -> Option<ApiRequest> {
        match self {
            DocumentSource::Sample => None,
            DocumentSource::TextFile(path) => Some(ApiRequest::ReadTextFile { path: path.clone() }),
            DocumentSource::Pdf(path) => Some(ApiRequest::ExtractPdf { path: path.clone() }),
        }
    }
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPicker {
    pub selection: WordSelection,
    pub cursor: usize,
}

/// Reader screen state: the open document, the focused word and the list picker.
#[derive(Debug, Clone)]
pub struct ReaderView {
    pub source: DocumentSource,
    pub document: Option<ReaderDocument>,
    pub cursor: usize,
    pub picker: Option<ListPicker>,
    pub status: Option<String>,
    pub saving: bool,
}

impl ReaderView {
    pub fn loading(source: DocumentSource) -> Self {
        Self {
            source,
            document: None,
            cursor: 0,
            picker: None,
            status: None,
            saving: false,
        }
    }

    pub fn sample() -> Self {
        let mut view = Self::loading(DocumentSource::Sample);
        view.open(ReaderDocument::sample());
        view
    }

    pub fn is_loading(&self) -> bool {
        self.document.is_none()
    }

    pub fn open(&mut self, document: ReaderDocument) {
        self.cursor = document.first_selectable().unwrap_or(0);
        tracing::info!(
            "Opened '{}' with {} tokens",
            document.title,
            document.tokens().len()
        );
        self.document = Some(document);
    }

    pub fn move_next(&mut self) {
        if let Some(next) = self.document.as_ref().and_then(|d| d.next_selectable(self.cursor)) {
            self.cursor = next;
        }
    }

    pub fn move_prev(&mut self) {
        if let Some(prev) = self.document.as_ref().and_then(|d| d.prev_selectable(self.cursor)) {
            self.cursor = prev;
        }
    }

    /// Opens the list picker for the focused word.
    pub fn pick(&mut self) -> bool {
        if self.saving {
            return false;
        }
        let Some(selection) = self.document.as_ref().and_then(|d| d.selection(self.cursor)) else {
            return false;
        };
        self.status = None;
        self.picker = Some(ListPicker {
            selection,
            cursor: 0,
        });
        true
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }
}

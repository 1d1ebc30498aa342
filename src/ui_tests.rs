//! Render checks for each screen against ratatui's `TestBackend`.

use crate::api::fake::FakeBackend;
use crate::api_worker::ApiWorker;
use crate::app::{App, LoginForm, MenuState, Notice};
use crate::auth::AuthSession;
use crate::models::{
    AnswerDetail, AnswerRecord, AppState, ChoiceOption, FillBlankQuestion, MatchingPair,
    MatchingQuestion, MultipleChoiceQuestion, Question, QuizResult, Word, WordList,
};
use crate::reader::ReaderView;
use crate::session::QuizSession;
use crate::setup::QuizSetup;
use crate::ui;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Frame, Terminal, backend::TestBackend};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

fn render(draw: impl FnOnce(&mut Frame)) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
    terminal.draw(draw).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn word(english: &str, turkish: &str) -> Word {
    Word {
        id: english.to_string(),
        english: english.to_string(),
        turkish: turkish.to_string(),
        meaning_en: String::new(),
        part_of_speech: String::new(),
        example: String::new(),
        example_tr: String::new(),
    }
}

fn feelings() -> WordList {
    WordList {
        id: 1,
        name: "Feelings".to_string(),
        words: vec![word("happy", "mutlu"), word("sad", "üzgün")],
    }
}

fn session(question: Question) -> QuizSession {
    QuizSession::new("Feelings", vec![question], StdRng::seed_from_u64(3)).unwrap()
}

#[test]
fn test_login_masks_password() {
    let form = LoginForm {
        email: "ada@example.com".to_string(),
        password: "secret".to_string(),
        error: Some("Invalid email or password.".to_string()),
        ..Default::default()
    };
    let screen = render(|f| ui::draw_login(f, &form));
    assert!(screen.contains("Sign In"));
    assert!(screen.contains("ada@example.com"));
    assert!(screen.contains("******"));
    assert!(!screen.contains("secret"));
    assert!(screen.contains("Invalid email or password."));
    assert!(!screen.contains("Name"));
}

#[test]
fn test_register_form_shows_name_field() {
    let form = LoginForm {
        registering: true,
        ..Default::default()
    };
    let screen = render(|f| ui::draw_login(f, &form));
    assert!(screen.contains("Create an Account"));
    assert!(screen.contains("Name"));
}

#[test]
fn test_menu_lists_words_and_greeting() {
    let menu = MenuState {
        lists: vec![feelings()],
        ..Default::default()
    };
    let screen = render(|f| ui::draw_menu(f, &menu, Some("Ada")));
    assert!(screen.contains("Hello, Ada"));
    assert!(screen.contains("Feelings (2 words)"));
    assert!(screen.contains("happy - mutlu"));
    assert!(screen.contains("üzgün"));
}

#[test]
fn test_menu_empty_state() {
    let menu = MenuState::default();
    let screen = render(|f| ui::draw_menu(f, &menu, None));
    assert!(screen.contains("No word lists yet"));
}

#[test]
fn test_setup_shows_cap_and_loading_message() {
    let mut setup = QuizSetup::new(feelings()).unwrap();
    setup.push_char('3');
    let screen = render(|f| ui::draw_setup(f, &setup, Instant::now()));
    assert!(screen.contains("Quiz Setup - Feelings"));
    assert!(screen.contains("(1-4)"));

    let now = Instant::now();
    setup.begin(now).unwrap();
    let screen = render(|f| ui::draw_setup(f, &setup, now));
    assert!(screen.contains("Preparing questions..."));
}

#[test]
fn test_multiple_choice_screen() {
    let question = MultipleChoiceQuestion::new(
        "q1",
        "Which word means mutlu?",
        vec![
            ChoiceOption {
                id: "opt_0".to_string(),
                text: "happy".to_string(),
            },
            ChoiceOption {
                id: "opt_1".to_string(),
                text: "sad".to_string(),
            },
        ],
        ["opt_0".to_string()].into_iter().collect(),
    )
    .unwrap();
    let quiz = session(Question::MultipleChoice(question));
    let screen = render(|f| ui::draw_quiz(f, &quiz));
    assert!(screen.contains("Question 1 / 1 - Feelings - Multiple Choice"));
    assert!(screen.contains("Which word means mutlu?"));
    assert!(screen.contains("[ ] 1. happy"));
    assert!(screen.contains("[ ] 2. sad"));
}

#[test]
fn test_fill_blank_screen() {
    let question = FillBlankQuestion::new(
        "q2",
        "I feel _____ today.",
        "HAPPY",
        vec!['P', 'H', 'A', 'Y', 'P', 'Q'],
        "mutlu",
    )
    .unwrap();
    let quiz = session(Question::FillBlank(question));
    let screen = render(|f| ui::draw_quiz(f, &quiz));
    assert!(screen.contains("I feel _____ today."));
    assert!(screen.contains("Hint: mutlu"));
    assert!(screen.contains(" Q "));
}

#[test]
fn test_matching_screen() {
    let question = MatchingQuestion::new(
        "q3",
        vec![
            MatchingPair {
                id: "pair_0".to_string(),
                left: "happy".to_string(),
                right: "mutlu".to_string(),
            },
            MatchingPair {
                id: "pair_1".to_string(),
                left: "tired".to_string(),
                right: "yorgun".to_string(),
            },
        ],
    )
    .unwrap();
    let quiz = session(Question::Matching(question));
    let screen = render(|f| ui::draw_quiz(f, &quiz));
    assert!(screen.contains("Words (0/2 matched)"));
    assert!(screen.contains("yorgun"));
    assert!(screen.contains("tired"));
}

#[test]
fn test_summary_screen() {
    let result = QuizResult {
        list_name: "Feelings".to_string(),
        score: 1,
        total_questions: 2,
        answers: vec![
            AnswerRecord {
                question_id: "q1".to_string(),
                is_correct: true,
                detail: AnswerDetail::Typed("HAPPY".to_string()),
            },
            AnswerRecord {
                question_id: "q2".to_string(),
                is_correct: false,
                detail: AnswerDetail::Selected(BTreeSet::new()),
            },
        ],
    };
    let screen = render(|f| ui::draw_summary(f, &result));
    assert!(screen.contains("Quiz Complete - Feelings"));
    assert!(screen.contains("Score: 1 / 2 (50%)"));
    assert!(screen.contains("1. Answer: HAPPY"));
    assert!(screen.contains("2. 0 options selected"));
}

#[test]
fn test_reader_with_picker() {
    let mut reader = ReaderView::sample();
    assert!(reader.pick());
    let lists = vec![feelings()];
    let screen = render(|f| ui::draw_reader(f, &reader, &lists));
    assert!(screen.contains("Reader - Sample text"));
    assert!(screen.contains("Add \"Welcome\" to"));
    assert!(screen.contains("Feelings"));
}

#[test]
fn test_notice_drawn_over_screen() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let auth = Arc::new(AuthSession::new(Arc::new(FakeBackend::new())));
    let worker = ApiWorker::new(rt.handle().clone(), auth);
    let mut app = App::new(worker, None, StdRng::seed_from_u64(1));
    app.state = AppState::Menu;
    app.notice = Some(Notice::error("Server unavailable"));

    let screen = render(|f| ui::draw(f, &app, Instant::now()));
    assert!(screen.contains("Error"));
    assert!(screen.contains("Server unavailable"));
    assert!(!screen.contains("Try Again"));
}

#[test]
fn test_quit_confirmation() {
    let screen = render(ui::draw_quit_confirmation);
    assert!(screen.contains("Quit Quiz"));
    assert!(screen.contains("Yes (Return to Menu)"));
}

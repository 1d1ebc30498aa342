pub mod adapter;
pub mod api;
pub mod api_worker;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod reader;
pub mod session;
pub mod setup;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod ui_tests;

// Re-exports for convenience
pub use app::App;
pub use error::{Error, Result};
pub use models::{AppState, Question, QuizResult, WordList};
pub use session::{QuizSession, handle_quiz_input};
pub use ui::{draw, draw_menu, draw_quit_confirmation, draw_quiz, draw_summary};

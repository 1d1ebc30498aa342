pub mod layout;
mod login;
mod menu;
mod notice;
mod quiz;
mod reader;
mod setup;
mod summary;

pub use layout::{calculate_quiz_chunks, calculate_summary_chunks, centered_rect};
pub use login::draw_login;
pub use menu::draw_menu;
pub use notice::draw_notice;
pub use quiz::{draw_quit_confirmation, draw_quiz};
pub use reader::draw_reader;
pub use setup::draw_setup;
pub use summary::draw_summary;

use crate::app::App;
use crate::models::AppState;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::Span,
};
use std::time::Instant;

/// Draws whichever screen `app` is on, with any notice on top.
pub fn draw(f: &mut Frame, app: &App, now: Instant) {
    match app.state {
        AppState::Login => draw_login(f, &app.login),
        AppState::Menu => draw_menu(f, &app.menu, app.current_user_name().as_deref()),
        AppState::QuizSetup => {
            if let Some(setup) = &app.setup {
                draw_setup(f, setup, now);
            }
        }
        AppState::Quiz => {
            if let Some(quiz) = &app.quiz {
                draw_quiz(f, quiz);
            }
        }
        AppState::QuizQuitConfirm => draw_quit_confirmation(f),
        AppState::Summary => {
            if let Some(result) = &app.result {
                draw_summary(f, result);
            }
        }
        AppState::Reader => {
            if let Some(reader) = &app.reader {
                draw_reader(f, reader, &app.menu.lists);
            }
        }
    }

    if let Some(notice) = &app.notice {
        draw_notice(f, notice);
    }
}

/// A key name followed by what it does, for help bars.
pub(crate) fn key_hint<'a>(key: &'a str, label: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(label),
    ]
}

use crate::setup::{QuizSetup, SetupStep};
use crate::ui::key_hint;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::time::Instant;

pub fn draw_setup(f: &mut Frame, setup: &QuizSetup, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new(format!("Quiz Setup - {}", setup.list.name))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let count_title = format!("Number of questions (1-{})", setup.max_questions());
    let count_style = if setup.step() == SetupStep::Count {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let count = Paragraph::new(setup.count_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(count_style)
            .title(count_title),
    );
    f.render_widget(count, chunks[1]);

    let mut body = Text::default();
    let mut spans = Vec::new();
    match setup.step() {
        SetupStep::Count => {
            body.push_line(Line::from(format!(
                "{} words in this list.",
                setup.list.word_count()
            )));
            body.push_line(Line::from(Span::styled(
                "Larger counts are capped at twice the word count, up to 50.",
                Style::default().fg(Color::DarkGray),
            )));
            spans.extend(key_hint("0-9", " Count  "));
            spans.extend(key_hint("Enter", " Start  "));
            spans.extend(key_hint("Esc", " Back"));
        }
        SetupStep::Loading { .. } => {
            body.push_line(Line::from(Span::styled(
                setup.loading_message(now),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            spans.extend(key_hint("Esc", " Cancel"));
        }
        SetupStep::Failed => {
            if let Some(error) = setup.error() {
                body.push_line(Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(Color::Red),
                )));
                if error.is_retryable() {
                    spans.extend(key_hint("r", " Try Again  "));
                }
            }
            spans.extend(key_hint("Enter", " Back"));
        }
    }

    let content = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, chunks[2]);

    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

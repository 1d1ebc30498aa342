use crate::models::{AnswerDetail, QuizResult};
use crate::ui::key_hint;
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn verdict(percentage: u32) -> (&'static str, Color) {
    match percentage {
        90.. => ("Excellent work!", Color::Green),
        70..=89 => ("Well done!", Color::Green),
        50..=69 => ("Not bad, keep practising.", Color::Yellow),
        _ => ("Keep going, review these words and try again.", Color::Red),
    }
}

fn describe(detail: &AnswerDetail) -> String {
    match detail {
        AnswerDetail::Selected(ids) => {
            let noun = if ids.len() == 1 { "option" } else { "options" };
            format!("{} {} selected", ids.len(), noun)
        }
        AnswerDetail::Typed(text) => format!("Answer: {}", truncate_string(text, 40)),
        AnswerDetail::Matched(ids) => format!("{} pairs matched", ids.len()),
    }
}

pub fn draw_summary(f: &mut Frame, result: &QuizResult) {
    let layout = calculate_summary_chunks(f.area());

    let title = Paragraph::new(format!("Quiz Complete - {}", result.list_name))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let percentage = result.percentage();
    let (message, color) = verdict(percentage);
    let score = Paragraph::new(vec![
        Line::styled(
            format!(
                "Score: {} / {} ({}%)",
                result.score, result.total_questions, percentage
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled(message, Style::default().fg(color)),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(score, layout.score_area);

    let mut answers = Text::default();
    for (i, record) in result.answers.iter().enumerate() {
        let (mark, style) = if record.is_correct {
            ("[✓]", Style::default().fg(Color::Green))
        } else {
            ("[✗]", Style::default().fg(Color::Red))
        };
        answers.push_line(Line::from(vec![
            Span::styled(mark, style),
            Span::from(format!(" {}. {}", i + 1, describe(&record.detail))),
        ]));
    }
    let answers = Paragraph::new(answers)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Answers"));
    f.render_widget(answers, layout.answers_area);

    let mut spans = Vec::new();
    spans.extend(key_hint("r", " Retake  "));
    spans.extend(key_hint("m", " Main Menu  "));
    spans.extend(key_hint("Ctrl+C", " Exit App"));
    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}

use crate::app::{Notice, NoticeLevel};
use crate::ui::{centered_rect, key_hint};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn draw_notice(f: &mut Frame, notice: &Notice) {
    let area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);

    let (title, color) = match notice.level {
        NoticeLevel::Info => ("Notice", Color::Cyan),
        NoticeLevel::Error => ("Error", Color::Red),
    };

    let mut text = Text::default();
    text.push_line(Line::from(notice.message.as_str()));
    text.push_line(Line::from(""));
    let mut spans = Vec::new();
    if notice.can_retry() {
        spans.extend(key_hint("r", " Try Again  "));
    }
    spans.extend(key_hint("Enter", " Dismiss"));
    text.push_line(Line::from(spans));

    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Line::styled(
                    title,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(popup, area);
}

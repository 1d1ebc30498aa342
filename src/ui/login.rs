use crate::app::{LoginField, LoginForm};
use crate::ui::key_hint;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

fn field_label(field: LoginField) -> &'static str {
    match field {
        LoginField::Name => "Name",
        LoginField::Email => "Email",
        LoginField::Password => "Password",
    }
}

pub fn draw_login(f: &mut Frame, form: &LoginForm) {
    let fields = form.fields();
    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.extend([Constraint::Min(1), Constraint::Length(3)]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(f.area());

    let title = if form.registering {
        "Create an Account"
    } else {
        "Sign In"
    };
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let focused = form.focused();
    for (i, field) in fields.iter().enumerate() {
        let value = match field {
            LoginField::Name => form.name.clone(),
            LoginField::Email => form.email.clone(),
            LoginField::Password => "*".repeat(form.password.chars().count()),
        };
        let border = if *field == focused && !form.busy {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(field_label(*field)),
        );
        f.render_widget(input, chunks[i + 1]);
    }

    let status_area = chunks[fields.len() + 1];
    let status = if form.busy {
        Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &form.error {
        Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
    } else {
        Line::from("")
    };
    f.render_widget(
        Paragraph::new(status).alignment(Alignment::Center),
        status_area,
    );

    let toggle = if form.registering {
        " Have an account?  "
    } else {
        " New here?  "
    };
    let mut spans = Vec::new();
    spans.extend(key_hint("Tab", " Next Field  "));
    spans.extend(key_hint("Enter", " Submit  "));
    spans.extend(key_hint("Ctrl+N", toggle));
    spans.extend(key_hint("Esc", " Quit"));
    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[fields.len() + 2]);
}

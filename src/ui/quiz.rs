use crate::quiz::{
    Column, FillBlankRenderer, ItemStatus, MatchingRenderer, MultipleChoiceRenderer,
    OptionStatus, QuestionRenderer,
};
use crate::session::QuizSession;
use crate::ui::key_hint;
use crate::ui::layout::calculate_quiz_chunks;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn option_style(status: OptionStatus, focused: bool) -> Style {
    let style = match status {
        OptionStatus::Idle => Style::default(),
        OptionStatus::Selected => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        OptionStatus::Correct => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        OptionStatus::Wrong => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    if focused {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

fn item_style(status: ItemStatus, focused: bool) -> Style {
    let style = match status {
        ItemStatus::Idle => Style::default(),
        ItemStatus::Selected => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        ItemStatus::Matched => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::DIM),
        ItemStatus::Wrong => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    if focused {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

pub fn draw_quiz(f: &mut Frame, session: &QuizSession) {
    let layout = calculate_quiz_chunks(f.area());

    let kind = session.current_question().kind();
    let progress = format!(
        "Question {} / {} - {} - {}",
        session.current_index + 1,
        session.total_questions(),
        session.list_name,
        kind.label()
    );
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let mut prompt = match session.renderer() {
        QuestionRenderer::MultipleChoice(r) => multiple_choice_prompt(r),
        QuestionRenderer::FillBlank(r) => fill_blank_prompt(r),
        QuestionRenderer::Matching(_) => Text::from("Match each word with its meaning."),
    };
    if let Some(correct) = session.last_outcome() {
        prompt.push_line(Line::from(""));
        prompt.push_line(if correct {
            Line::styled(
                "Correct!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Line::styled(
                "Not quite.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        });
    }
    let question = Paragraph::new(prompt)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.prompt_area);

    match session.renderer() {
        QuestionRenderer::MultipleChoice(r) => draw_options(f, r, layout.answer_area),
        QuestionRenderer::FillBlank(r) => draw_letter_pool(f, r, layout.answer_area),
        QuestionRenderer::Matching(r) => draw_matching(f, r, layout.answer_area),
    }

    let mut keys = Vec::new();
    match session.renderer() {
        QuestionRenderer::MultipleChoice(r) => {
            keys.extend(key_hint("↑/↓", " Navigate  "));
            keys.extend(key_hint("Space/1-9", " Select  "));
            if !r.is_submitted() {
                keys.extend(key_hint("Enter", " Submit  "));
            }
        }
        QuestionRenderer::FillBlank(_) => {
            keys.extend(key_hint("A-Z", " Type  "));
            keys.extend(key_hint("←/→", " Move  "));
            keys.extend(key_hint("Enter", " Pick  "));
            keys.extend(key_hint("Backspace", " Undo  "));
        }
        QuestionRenderer::Matching(_) => {
            keys.extend(key_hint("Tab/←/→", " Column  "));
            keys.extend(key_hint("↑/↓", " Navigate  "));
            keys.extend(key_hint("Enter", " Pick  "));
        }
    }
    keys.extend(key_hint("Esc", " Quit to Menu"));

    let help_text = vec![
        Line::from(keys),
        Line::from(key_hint("Ctrl+C", " Exit App").to_vec()),
    ];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn multiple_choice_prompt(r: &MultipleChoiceRenderer) -> Text<'_> {
    let mut text = Text::from(r.question.prompt.as_str());
    if r.question.allow_multiple {
        text.push_line(Line::styled(
            "Select all that apply.",
            Style::default().fg(Color::DarkGray),
        ));
    }
    text
}

fn fill_blank_prompt(r: &FillBlankRenderer) -> Text<'_> {
    let (before, after) = r.question.sentence_parts();
    let entered = r.entered_text();
    let missing = r.question.answer_len().saturating_sub(entered.chars().count());
    let blank_style = if r.is_completed() {
        let color = if r.is_correct() { Color::Green } else { Color::Red };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };

    let mut text = Text::from(Line::from(vec![
        Span::from(before),
        Span::styled(format!("{}{}", entered, "_".repeat(missing)), blank_style),
        Span::from(after),
    ]));
    if !r.question.hint.is_empty() {
        text.push_line(Line::styled(
            format!("Hint: {}", r.question.hint),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    text
}

fn draw_options(f: &mut Frame, r: &MultipleChoiceRenderer, area: Rect) {
    let items: Vec<ListItem> = r
        .question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let status = r.option_status(&option.id);
            let marker = if r.selected().contains(&option.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let focused = i == r.cursor && !r.is_submitted();
            ListItem::new(format!("{} {}. {}", marker, i + 1, option.text))
                .style(option_style(status, focused))
        })
        .collect();

    let options = List::new(items).block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(options, area);
}

fn draw_letter_pool(f: &mut Frame, r: &FillBlankRenderer, area: Rect) {
    let mut spans = Vec::new();
    for (i, slot) in r.available().iter().enumerate() {
        let label = match slot {
            Some(letter) => format!(" {} ", letter),
            None => "   ".to_string(),
        };
        let mut style = if r.wrong_slot() == Some(i) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if slot.is_some() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if i == r.cursor && !r.is_completed() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(label, style));
        spans.push(Span::from(" "));
    }

    let pool = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Letters"));
    f.render_widget(pool, area);
}

fn draw_matching(f: &mut Frame, r: &MatchingRenderer, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left: Vec<ListItem> = r
        .left_items()
        .enumerate()
        .map(|(i, pair)| {
            let focused = r.focus == Column::Left && i == r.left_cursor;
            ListItem::new(pair.left.as_str())
                .style(item_style(r.status(Column::Left, &pair.id), focused))
        })
        .collect();
    let right: Vec<ListItem> = r
        .right_items()
        .enumerate()
        .map(|(i, pair)| {
            let focused = r.focus == Column::Right && i == r.right_cursor;
            ListItem::new(pair.right.as_str())
                .style(item_style(r.status(Column::Right, &pair.id), focused))
        })
        .collect();

    let border = |column: Column| {
        if r.focus == column {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let title = format!("Words ({}/{} matched)", r.matched().len(), r.question.pairs.len());
    f.render_widget(
        List::new(left).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border(Column::Left))
                .title(title),
        ),
        columns[0],
    );
    f.render_widget(
        List::new(right).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border(Column::Right))
                .title("Meanings"),
        ),
        columns[1],
    );
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit Quiz")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Your progress will be lost. Return to the menu?")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Quiz)  "),
        Span::styled(
            "Ctrl+C",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

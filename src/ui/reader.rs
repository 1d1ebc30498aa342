use crate::models::WordList;
use crate::reader::{ListPicker, ReaderDocument, ReaderView};
use crate::ui::{centered_rect, key_hint};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

/// Rough wrapped height of each paragraph at `width` columns.
fn paragraph_heights(document: &ReaderDocument, width: usize) -> Vec<usize> {
    let mut chars = vec![0usize; document.paragraph_count()];
    for token in document.tokens() {
        chars[token.paragraph] += token.text.chars().count() + 1;
    }
    chars
        .into_iter()
        .map(|c| c.div_ceil(width.max(1)).max(1) + 1)
        .collect()
}

/// First paragraph to draw so the focused one stays on screen.
fn first_visible_paragraph(heights: &[usize], focused: usize, visible: usize) -> usize {
    let mut first = 0;
    let mut used: usize = heights.iter().take(focused + 1).sum();
    while used > visible && first < focused {
        used -= heights[first];
        first += 1;
    }
    first
}

fn document_text(document: &ReaderDocument, cursor: usize, first: usize) -> Text<'_> {
    let mut text = Text::default();
    let mut line: Vec<Span> = Vec::new();
    let mut paragraph = first;

    for (i, token) in document.tokens().iter().enumerate() {
        if token.paragraph < first {
            continue;
        }
        if token.paragraph != paragraph {
            text.push_line(Line::from(std::mem::take(&mut line)));
            text.push_line(Line::from(""));
            paragraph = token.paragraph;
        }
        let style = if i == cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
        };
        line.push(Span::styled(token.text.as_str(), style));
        line.push(Span::from(" "));
    }
    if !line.is_empty() {
        text.push_line(Line::from(line));
    }
    text
}

pub fn draw_reader(f: &mut Frame, reader: &ReaderView, lists: &[WordList]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = match &reader.document {
        Some(document) => format!("Reader - {}", document.title),
        None => format!("Reader - {}", reader.source.title()),
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

    let body_area = chunks[1];
    let body = match &reader.document {
        None => Paragraph::new(Line::styled(
            "Loading document...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Some(document) => {
            let width = body_area.width.saturating_sub(2) as usize;
            let visible = body_area.height.saturating_sub(2) as usize;
            let heights = paragraph_heights(document, width);
            let focused = document
                .tokens()
                .get(reader.cursor)
                .map_or(0, |t| t.paragraph);
            let first = first_visible_paragraph(&heights, focused, visible);
            Paragraph::new(document_text(document, reader.cursor, first))
                .wrap(Wrap { trim: true })
        }
    };
    f.render_widget(body.block(Block::default().borders(Borders::ALL)), body_area);

    let status = match &reader.status {
        Some(status) => status.clone(),
        None => reader
            .document
            .as_ref()
            .and_then(|d| d.selection(reader.cursor))
            .map(|s| s.sentence)
            .unwrap_or_default(),
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title("Context"));
    f.render_widget(status, chunks[2]);

    let mut spans = Vec::new();
    spans.extend(key_hint("←/→", " Move  "));
    spans.extend(key_hint("Enter", " Add Word  "));
    spans.extend(key_hint("Esc", " Back"));
    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);

    if let Some(picker) = &reader.picker {
        draw_list_picker(f, picker, lists, reader.saving);
    }
}

fn draw_list_picker(f: &mut Frame, picker: &ListPicker, lists: &[WordList], saving: bool) {
    let area: Rect = centered_rect(50, 50, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let items: Vec<ListItem> = lists
        .iter()
        .enumerate()
        .map(|(i, list)| {
            let style = if i == picker.cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(list.name.as_str()).style(style)
        })
        .collect();
    let title = format!("Add \"{}\" to", picker.selection.word);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );
    f.render_widget(list, chunks[0]);

    let footer = if saving {
        Line::styled("Saving...", Style::default().fg(Color::Yellow))
    } else {
        let mut spans = Vec::new();
        spans.extend(key_hint("Enter", " Add  "));
        spans.extend(key_hint("Esc", " Cancel"));
        Line::from(spans)
    };
    f.render_widget(Paragraph::new(footer).alignment(Alignment::Center), chunks[1]);
}

use crate::app::{MenuFocus, MenuInputKind, MenuState};
use crate::models::WordList;
use crate::ui::key_hint;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

fn draw_panel_header(area: Rect, title: &str, focused: bool, f: &mut Frame) {
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let header = Paragraph::new(title)
        .style(style)
        .alignment(Alignment::Left)
        .block(Block::default());

    f.render_widget(header, area);
}

fn empty_item(text: &str) -> ListItem<'_> {
    ListItem::new(text).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn format_list_item(list: &WordList) -> String {
    let noun = if list.word_count() == 1 { "word" } else { "words" };
    format!("{} ({} {})", list.name, list.word_count(), noun)
}

pub fn draw_menu(f: &mut Frame, menu: &MenuState, user: Option<&str>) {
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

    let title = match user {
        Some(name) => format!("Vocab Quiz - Hello, {}", name),
        None => "Vocab Quiz".to_string(),
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

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    let list_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(panels[0]);
    let word_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(panels[1]);

    let lists_focused = menu.focus == MenuFocus::Lists;
    let list_title = if menu.loading {
        "Word Lists (refreshing...)"
    } else {
        "Word Lists"
    };
    draw_panel_header(list_chunks[0], list_title, lists_focused, f);

    let list_items: Vec<ListItem> = if menu.lists.is_empty() {
        let text = if menu.loading {
            "Loading word lists..."
        } else {
            "No word lists yet. Press n to create one."
        };
        vec![empty_item(text)]
    } else {
        menu.lists
            .iter()
            .enumerate()
            .map(|(i, list)| {
                let style = if i == menu.selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format_list_item(list)).style(style)
            })
            .collect()
    };
    let lists = List::new(list_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(lists_focused)),
    );
    f.render_widget(lists, list_chunks[1]);

    draw_panel_header(word_chunks[0], "Words", !lists_focused, f);
    let word_width = word_chunks[1].width.saturating_sub(2) as usize;
    let word_items: Vec<ListItem> = match menu.selected_list() {
        Some(list) if !list.words.is_empty() => list
            .words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let text = if word.turkish.is_empty() {
                    word.english.clone()
                } else {
                    format!("{} - {}", word.english, word.turkish)
                };
                let style = if !lists_focused && i == menu.word_cursor {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(truncate_string(&text, word_width.max(4))).style(style)
            })
            .collect(),
        Some(_) => vec![empty_item("This list has no words yet")],
        None => vec![],
    };
    let words = List::new(word_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(!lists_focused)),
    );
    f.render_widget(words, word_chunks[1]);

    let status = if let Some(input) = &menu.input {
        let label = match input.kind {
            MenuInputKind::NewList => "New list name",
            MenuInputKind::OpenFile => "Open file (.pdf or text)",
        };
        Paragraph::new(input.buffer.as_str())
            .block(Block::default().borders(Borders::ALL).title(label))
    } else if menu.confirm_delete {
        let name = menu.selected_list().map_or("", |l| l.name.as_str());
        Paragraph::new(Line::from(vec![
            Span::from(format!("Delete \"{}\"? ", name)),
            Span::styled(
                "y",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::from(" Yes  "),
            Span::styled(
                "any key",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::from(" No"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    } else {
        let text = match &menu.status {
            Some(status) => status.clone(),
            None if menu.from_cache => match menu.synced_at {
                Some(at) => format!("Showing saved lists from {}", at.format("%Y-%m-%d %H:%M")),
                None => "Showing saved lists".to_string(),
            },
            None => String::new(),
        };
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    };
    f.render_widget(status, chunks[2]);

    let mut spans = Vec::new();
    spans.extend(key_hint("Enter", " Quiz  "));
    spans.extend(key_hint("Tab", " Words  "));
    if lists_focused {
        spans.extend(key_hint("n", " New  "));
        spans.extend(key_hint("d", " Delete  "));
    } else {
        spans.extend(key_hint("x", " Remove Word  "));
    }
    spans.extend(key_hint("o", " Reader  "));
    spans.extend(key_hint("f", " Open File  "));
    spans.extend(key_hint("r", " Refresh  "));
    spans.extend(key_hint("l", " Log Out  "));
    spans.extend(key_hint("q", " Quit"));
    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

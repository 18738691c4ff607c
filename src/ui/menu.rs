//! Menu side panel: bookmarks and preferences

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use kelitui::i18n::{t, Label};
use kelitui::logic::formatting::{heat_indicator, truncate};
use kelitui::registry::Language;
use kelitui::session::Session;

pub fn render_menu(f: &mut Frame, area: Rect, session: &Session) {
    let language = session.language.get();

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", t(language, Label::Menu)))
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(inner);

    render_bookmarks(f, chunks[0], session, language);
    render_preferences(f, chunks[1], session, language);
}

fn render_bookmarks(f: &mut Frame, area: Rect, session: &Session, language: Language) {
    let entries = session.menu_entries();
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .title(format!("{} ({})", t(language, Label::Bookmarks), entries.len()));

    if entries.is_empty() {
        let empty = Paragraph::new(t(language, Label::NoBookmarks))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(8);
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let mut spans = vec![
                Span::styled("★ ", Style::default().fg(Color::Yellow)),
                Span::raw(truncate(&entry.name, name_width)),
            ];
            if let Some(count) = entry.heat {
                spans.push(Span::styled(
                    format!(" {}", heat_indicator(count)),
                    Style::default().fg(Color::LightRed),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(session.model.menu.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_preferences(f: &mut Frame, area: Rect, session: &Session, language: Language) {
    let key = Style::default().fg(Color::Yellow);
    let language_name = match language {
        Language::En => "English",
        Language::Fi => "Suomi",
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("s ", key),
            Span::raw(format!(
                "{}: {}",
                t(language, Label::MapStyle),
                session.map_style.get().as_str()
            )),
        ]),
        Line::from(vec![
            Span::styled("L ", key),
            Span::raw(format!("{}: {}", t(language, Label::Language), language_name)),
        ]),
        Line::from(vec![
            Span::styled("C ", key),
            Span::raw(t(language, Label::ClearAll)),
        ]),
        Line::from(vec![
            Span::styled("d ", key),
            Span::raw("✕"),
            Span::raw("  "),
            Span::styled("Enter ", key),
            Span::raw(t(language, Label::ViewDetails)),
        ]),
    ];

    f.render_widget(Paragraph::new(lines), area);
}

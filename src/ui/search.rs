//! Search Input UI
//!
//! Renders the station search popup: input line with blinking cursor and
//! the matching stations below it.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use kelitui::i18n::{t, Label};
use kelitui::logic::formatting::heat_indicator;
use kelitui::session::{Session, SEARCH_LIMIT};

/// Render the search popup at the top of `area`
pub fn render_search(f: &mut Frame, area: Rect, session: &Session) {
    let language = session.language.get();
    let ui = &session.model.ui;
    let results = session.search_results();

    let width = area.width.min(60);
    let height = (results.len() as u16 + 5).min(area.height).max(3);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + 1,
        width,
        height,
    };
    f.render_widget(Clear, popup);

    let title = if ui.search_query.is_empty() {
        format!(" {} - Esc to cancel ", t(language, Label::Search))
    } else {
        format!(
            " {} ({} matches) - Esc to cancel ",
            t(language, Label::Search),
            results.len()
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if inner.height == 0 {
        return;
    }

    // Build input line with cursor
    let cursor_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::SLOW_BLINK);
    let input_line = Line::from(vec![
        Span::raw("Match: "),
        Span::raw(ui.search_query.as_str()),
        Span::styled("█", cursor_style), // Blinking cursor
    ]);
    f.render_widget(
        Paragraph::new(input_line),
        Rect {
            height: 1,
            ..inner
        },
    );

    if inner.height < 3 || results.is_empty() {
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .take(SEARCH_LIMIT)
        .map(|station| {
            let mut spans = vec![Span::raw(station.name.clone())];
            if let Some(count) = session.queries.interesting_count(&station.id) {
                spans.push(Span::styled(
                    format!(" {}", heat_indicator(count)),
                    Style::default().fg(Color::LightRed),
                ));
            }
            spans.push(Span::styled(
                format!("  {}", station.id),
                Style::default().fg(Color::DarkGray),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(ui.search_selected));

    let list_area = Rect {
        y: inner.y + 2,
        height: inner.height - 2,
        ..inner
    };
    f.render_stateful_widget(list, list_area, &mut state);
}

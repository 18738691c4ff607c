use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use kelitui::i18n::{t, Label};
use kelitui::registry::Language;

/// Render the "remove all bookmarks?" prompt
pub fn render_clear_confirmation(f: &mut Frame, language: Language, count: usize) {
    let prompt_text = format!("{}\n\n{} ★", t(language, Label::ConfirmClear), count);

    // Center the prompt
    let area = f.area();
    let prompt_width = 50.min(area.width);
    let prompt_height = 6.min(area.height);
    let prompt_area = Rect {
        x: (area.width.saturating_sub(prompt_width)) / 2,
        y: (area.height.saturating_sub(prompt_height)) / 2,
        width: prompt_width,
        height: prompt_height,
    };

    let prompt = Paragraph::new(prompt_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(t(language, Label::ClearAll))
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, prompt_area);
    f.render_widget(prompt, prompt_area);
}

const HELP: &[(&str, &str)] = &[
    ("Arrows / hjkl (vim)", "Pan the map"),
    ("+ / -", "Zoom in / out"),
    ("Enter", "Open station or expand cluster under ┼"),
    (".", "Back to my location"),
    ("/ or Ctrl-F", "Search stations by name"),
    ("m", "Menu: bookmarks, map style, language"),
    ("s / L", "Toggle map style / language"),
    ("R", "Reload the station list"),
    ("", ""),
    ("← → / Tab", "Previous / next camera"),
    ("f", "Fullscreen image"),
    ("c", "Copy shareable link"),
    ("b", "Bookmark station"),
    ("r", "Report something happening here"),
    ("Esc", "Close"),
    ("", ""),
    ("●▴", "Reported stations (more ▴ = more reports)"),
    ("(n)", "Cluster of n stations"),
    ("◉", "Your location"),
];

/// Render the key help overlay
pub fn render_help(f: &mut Frame) {
    let area = f.area();
    let width = 64.min(area.width);
    let height = (HELP.len() as u16 + 2).min(area.height);
    let help_area = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:<22}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help - any key to close ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(Clear, help_area);
    f.render_widget(help, help_area);
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use kelitui::i18n::{t, Label};
use kelitui::logic::errors::error_label;
use kelitui::model::LocationState;
use kelitui::query::Phase;
use kelitui::session::{MapSelection, Session};

/// Render the bottom status bar
/// - Left: station list state (count, loading, or the failure)
/// - Middle: what Enter would open, zoom and position
/// - Right: tile attribution of the current map style
pub fn render_status_bar(f: &mut Frame, area: Rect, session: &Session) {
    let language = session.language.get();
    let stations = session.queries.stations();

    let left = match stations.phase() {
        Phase::Success => Span::styled(
            format!(
                " {} {}",
                stations.data().map(Vec::len).unwrap_or(0),
                t(language, Label::Stations)
            ),
            Style::default().fg(Color::Green),
        ),
        Phase::Error => {
            let text = match stations.error() {
                Some(e) => format!(" {}: {} (R to retry)", error_label(&e.kind), e.message),
                None => format!(" {}", t(language, Label::LoadFailed)),
            };
            Span::styled(text, Style::default().fg(Color::Red))
        }
        Phase::Idle | Phase::Loading => Span::styled(
            format!(" {}", t(language, Label::Loading)),
            Style::default().fg(Color::Gray),
        ),
    };

    let viewport = &session.model.map.viewport;
    let mut middle = vec![];
    match session.selection_at_crosshair() {
        Some(MapSelection::Station { name, .. }) => {
            middle.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
            middle.push(Span::raw(format!(": {}  ", name)));
        }
        Some(MapSelection::Cluster { zoom, .. }) => {
            middle.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
            middle.push(Span::raw(format!(": zoom {}  ", zoom)));
        }
        None => {}
    }
    let location = match session.model.map.location {
        LocationState::Known(_) => "◉ ",
        LocationState::Pending => "… ",
        LocationState::Unavailable => "",
    };
    middle.push(Span::styled(
        format!(
            "{}z{} {:.3},{:.3}",
            location, viewport.zoom, viewport.center.latitude, viewport.center.longitude
        ),
        Style::default().fg(Color::Gray),
    ));

    let right = Span::styled(
        format!("{} ", session.map_style.get().attribution()),
        Style::default().fg(Color::DarkGray),
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ])
        .split(area);

    f.render_widget(Paragraph::new(Line::from(left)), chunks[0]);
    f.render_widget(
        Paragraph::new(Line::from(middle)).alignment(ratatui::layout::Alignment::Center),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(right)).alignment(ratatui::layout::Alignment::Right),
        chunks[2],
    );
}

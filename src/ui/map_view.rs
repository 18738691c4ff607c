//! Map canvas
//!
//! Draws the world coastline, station markers, clusters, interesting
//! stations, the device position and the selection crosshair onto a braille
//! canvas whose bounds follow the viewport.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders,
    },
    Frame,
};

use kelitui::logic::cluster::MapMarker;
use kelitui::logic::formatting::heat_indicator;
use kelitui::logic::map::{GeoPoint, Viewport};
use kelitui::registry::Palette;
use kelitui::session::{MapLayers, Session};

/// Zoom from which single stations get a name label
const LABEL_ZOOM: u8 = 10;

pub fn render_map(f: &mut Frame, area: Rect, session: &mut Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" KeliKamerat ");
    let inner = block.inner(area);

    // Pan and pick work in the cell grid of the last frame
    session.model.map.area = (inner.width, inner.height);

    let session = &*session;
    let palette = session.map_style.get().palette();
    let viewport = session.model.map.viewport;
    let bounds = viewport.bounds(inner.width, inner.height);
    let layers = session.map_layers();
    let device = session.model.map.device_position();
    let show_labels = viewport.zoom >= LABEL_ZOOM;

    let canvas = Canvas::default()
        .block(block.style(Style::default().fg(palette.coastline)))
        .background_color(palette.background)
        .marker(Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(|ctx| {
            ctx.draw(&Map {
                color: palette.coastline,
                resolution: MapResolution::High,
            });
            ctx.layer();

            draw_standard(ctx, &viewport, &layers, &palette, show_labels);
            draw_interesting(ctx, &viewport, &layers, &palette);

            if let Some(point) = device {
                ctx.print(
                    viewport.unwrap_longitude(point.longitude),
                    point.latitude,
                    Span::styled("◉", Style::default().fg(palette.location)),
                );
            }

            ctx.print(
                viewport.center.longitude,
                viewport.center.latitude,
                Span::styled(
                    "┼",
                    Style::default()
                        .fg(palette.crosshair)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        });

    f.render_widget(canvas, area);
}

fn draw_standard(
    ctx: &mut ratatui::widgets::canvas::Context<'_>,
    viewport: &Viewport,
    layers: &MapLayers<'_>,
    palette: &Palette,
    show_labels: bool,
) {
    let singles: Vec<(f64, f64)> = layers
        .markers
        .iter()
        .filter_map(|m| match m {
            MapMarker::Single { point, .. } => Some(coords(viewport, *point)),
            MapMarker::Cluster { .. } => None,
        })
        .collect();
    ctx.draw(&Points {
        coords: &singles,
        color: palette.station,
    });

    for marker in &layers.markers {
        match marker {
            MapMarker::Cluster { center, members } => {
                ctx.print(
                    viewport.unwrap_longitude(center.longitude),
                    center.latitude,
                    Span::styled(
                        format!("({})", members.len()),
                        Style::default()
                            .fg(palette.cluster)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
            MapMarker::Single { index, point } if show_labels => {
                let name = layers.standard[*index].name.clone();
                ctx.print(
                    viewport.unwrap_longitude(point.longitude),
                    point.latitude,
                    Span::styled(format!(" {}", name), Style::default().fg(palette.station)),
                );
            }
            MapMarker::Single { .. } => {}
        }
    }
}

/// Interesting stations are never clustered and draw above everything else
fn draw_interesting(
    ctx: &mut ratatui::widgets::canvas::Context<'_>,
    viewport: &Viewport,
    layers: &MapLayers<'_>,
    palette: &Palette,
) {
    for (station, count) in &layers.interesting {
        let style = Style::default()
            .fg(palette.interesting)
            .add_modifier(Modifier::BOLD);
        ctx.print(
            viewport.unwrap_longitude(station.longitude),
            station.latitude,
            Line::from(vec![
                Span::styled("●", style),
                Span::styled(heat_indicator(*count), style),
            ]),
        );
    }
}

fn coords(viewport: &Viewport, point: GeoPoint) -> (f64, f64) {
    (viewport.unwrap_longitude(point.longitude), point.latitude)
}

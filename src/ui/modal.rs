//! Station detail modal
//!
//! Header (title, bookmark, update time, heat), the selected camera image,
//! a strip of thumbnails, and the copy-link / report controls.

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use ratatui_image::StatefulImage;

use kelitui::api::StationDetail;
use kelitui::i18n::{t, Label};
use kelitui::logic::errors::error_label;
use kelitui::logic::formatting::{format_age_since, format_timestamp, heat_indicator, truncate};
use kelitui::model::{ModalModel, ReportState};
use kelitui::query::Phase;
use kelitui::registry::Language;
use kelitui::session::Session;
use kelitui::utils::format_bytes;

use super::layout::centered_rect;
use crate::{ImageKey, ImagePreviewState};

/// Height of the thumbnail strip in rows (including borders)
const STRIP_HEIGHT: u16 = 6;
/// Width of one thumbnail cell
const THUMB_WIDTH: u16 = 16;

type ImageStates = HashMap<ImageKey, (u64, ImagePreviewState)>;

pub fn render_modal(f: &mut Frame, area: Rect, session: &Session, images: &mut ImageStates) {
    let Some(modal) = session.model.modal() else {
        return;
    };
    let language = session.language.get();
    let now = Instant::now();

    let modal_area = if modal.fullscreen {
        area
    } else {
        centered_rect(90, 85, area)
    };
    f.render_widget(Clear, modal_area);

    let star = if modal.starred { "★ " } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {}{} ", star, modal.title))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(modal_area);
    f.render_widget(block, modal_area);

    let strip_height = if modal.fullscreen { 0 } else { STRIP_HEIGHT };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Status header
            Constraint::Min(3),               // Selected camera
            Constraint::Length(1),            // Camera caption
            Constraint::Length(strip_height), // Thumbnails
            Constraint::Length(1),            // Controls
        ])
        .split(inner);

    render_header(f, chunks[0], session, modal, language);

    let query = session
        .model
        .open_station_id()
        .and_then(|id| session.queries.detail(id));
    match (session.open_detail_phase(), session.open_detail()) {
        (_, Some(detail)) if detail.cameras.is_empty() => {
            render_centered(f, chunks[1], t(language, Label::NoCameras), Color::Gray);
        }
        (_, Some(detail)) => {
            render_camera(f, chunks[1], chunks[2], detail, modal, images);
            if !modal.fullscreen {
                render_strip(f, chunks[3], detail, modal, images);
            }
        }
        (Some(Phase::Error), None) => {
            let message = query
                .and_then(|q| q.error())
                .map(|e| format!("{}: {} ({})", t(language, Label::LoadFailed), error_label(&e.kind), e.message))
                .unwrap_or_else(|| t(language, Label::LoadFailed).to_string());
            render_centered(f, chunks[1], &message, Color::Red);
        }
        _ => render_centered(f, chunks[1], t(language, Label::Loading), Color::Gray),
    }

    render_controls(f, chunks[4], modal, language, now);
}

fn render_header(f: &mut Frame, area: Rect, session: &Session, modal: &ModalModel, language: Language) {
    let mut spans = Vec::new();

    if let Some(detail) = session.open_detail() {
        if !detail.operational {
            spans.push(Span::styled(
                format!("⚠ {}  ", t(language, Label::NotOperational)),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
    }

    // Detail timestamp first, station list timestamp as fallback
    let updated = session
        .open_detail()
        .and_then(|d| d.updated)
        .or_else(|| {
            session
                .queries
                .station(&modal.station_id)
                .and_then(|s| s.updated_time)
        });
    if let Some(updated) = updated {
        spans.push(Span::styled(
            format!(
                "{}: {} ({})  ",
                t(language, Label::Updated),
                format_timestamp(&updated),
                format_age_since(&updated, &Utc::now())
            ),
            Style::default().fg(Color::Gray),
        ));
    }

    if let Some(count) = session.queries.interesting_count(&modal.station_id) {
        spans.push(Span::styled(
            format!("{} {}", heat_indicator(count), count),
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::styled(
        format!("  [{}]", modal.station_id),
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_camera(
    f: &mut Frame,
    image_area: Rect,
    caption_area: Rect,
    detail: &StationDetail,
    modal: &ModalModel,
    images: &mut ImageStates,
) {
    let Some(camera) = detail.cameras.get(modal.camera_index) else {
        return;
    };

    let mut caption = format!(
        "{}/{}  {}",
        modal.camera_index + 1,
        detail.cameras.len(),
        camera.name
    );

    match image_slot(images, &(camera.id.clone(), false), modal.generation) {
        Some(ImagePreviewState::Ready { protocol, metadata }) => {
            f.render_stateful_widget(StatefulImage::default(), image_area, protocol);
            if let Some((w, h)) = metadata.dimensions {
                caption.push_str(&format!("  {}x{}", w, h));
            }
            caption.push_str(&format!("  {}", format_bytes(metadata.file_size)));
        }
        Some(ImagePreviewState::Failed { metadata }) => {
            let reason = metadata.format.clone().unwrap_or_default();
            render_centered(f, image_area, &format!("✗ {}", reason), Color::Red);
        }
        Some(ImagePreviewState::Loading) => {
            render_centered(f, image_area, "…", Color::Gray);
        }
        // Image previews disabled: point at the still instead
        None => render_centered(f, image_area, &camera.url, Color::Gray),
    }

    f.render_widget(
        Paragraph::new(caption)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        caption_area,
    );
}

fn render_strip(
    f: &mut Frame,
    area: Rect,
    detail: &StationDetail,
    modal: &ModalModel,
    images: &mut ImageStates,
) {
    if area.height == 0 || area.width < THUMB_WIDTH {
        return;
    }

    // Keep the selected camera visible when not all thumbnails fit
    let fit = (area.width / THUMB_WIDTH).max(1) as usize;
    let first = modal.camera_index.saturating_sub(fit - 1);

    for (slot, (index, camera)) in detail
        .cameras
        .iter()
        .enumerate()
        .skip(first)
        .take(fit)
        .enumerate()
    {
        let cell = Rect {
            x: area.x + slot as u16 * THUMB_WIDTH,
            y: area.y,
            width: THUMB_WIDTH,
            height: area.height,
        };
        let selected = index == modal.camera_index;
        let border = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(truncate(&camera.name, THUMB_WIDTH as usize - 2));
        let inner = block.inner(cell);
        f.render_widget(block, cell);

        match image_slot(images, &(camera.id.clone(), true), modal.generation) {
            Some(ImagePreviewState::Ready { protocol, .. }) => {
                f.render_stateful_widget(StatefulImage::default(), inner, protocol);
            }
            Some(ImagePreviewState::Failed { .. }) => render_centered(f, inner, "✗", Color::Red),
            _ => render_centered(f, inner, &(index + 1).to_string(), Color::Gray),
        }
    }
}

fn render_controls(f: &mut Frame, area: Rect, modal: &ModalModel, language: Language, now: Instant) {
    let key = Style::default().fg(Color::Yellow);

    let copy = if modal.is_copied(now) {
        Span::styled(t(language, Label::Copied), Style::default().fg(Color::Green))
    } else {
        Span::raw(t(language, Label::CopyUrl))
    };

    let bookmark = if modal.starred {
        Span::styled(
            format!("★ {}", t(language, Label::Bookmarked)),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::raw(format!("☆ {}", t(language, Label::Bookmark)))
    };

    let report = match modal.report {
        ReportState::Idle => Span::raw(t(language, Label::Report)),
        ReportState::Sending => Span::styled(
            t(language, Label::Reporting),
            Style::default().fg(Color::Gray),
        ),
        ReportState::Sent(_) => Span::styled(
            format!(
                "{} ({}s)",
                t(language, Label::Reported),
                modal
                    .report_remaining(now)
                    .map(|d| d.as_secs() + 1)
                    .unwrap_or(0)
            ),
            Style::default().fg(Color::Green),
        ),
        ReportState::Failed(_) => Span::styled(
            t(language, Label::ReportFailed),
            Style::default().fg(Color::Red),
        ),
    };

    let line = Line::from(vec![
        Span::styled("c", key),
        Span::raw(":"),
        copy,
        Span::raw("  "),
        Span::styled("b", key),
        Span::raw(":"),
        bookmark,
        Span::raw("  "),
        Span::styled("r", key),
        Span::raw(":"),
        report,
        Span::raw("  "),
        Span::styled("f", key),
        Span::raw(":⛶  "),
        Span::styled("Esc", key),
        Span::raw(":✕"),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_centered(f: &mut Frame, area: Rect, text: &str, color: Color) {
    if area.height == 0 {
        return;
    }
    let middle = Rect {
        y: area.y + area.height / 2,
        height: 1.min(area.height),
        ..area
    };
    f.render_widget(
        Paragraph::new(text.to_string())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );
}

/// Image of the open modal for a camera slot (older modals' images are hidden)
fn image_slot<'a>(
    images: &'a mut ImageStates,
    key: &ImageKey,
    generation: u64,
) -> Option<&'a mut ImagePreviewState> {
    match images.get_mut(key) {
        Some((g, state)) if *g == generation => Some(state),
        _ => None,
    }
}

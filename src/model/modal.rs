//! Detail Modal Model
//!
//! State of the station detail modal: which station, which camera, and the
//! transient state of its copy-link and report controls. Network I/O and
//! image decoding live in the app layer; this is plain data.

use std::time::{Duration, Instant};

use crate::api::StationDetail;
use crate::logic::carousel;
use crate::logic::ui::{is_transient_active, COPIED_CONFIRMATION, REPORT_INDICATOR};
use crate::registry::Language;

/// Lifecycle of the "interesting station" report control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportState {
    Idle,
    Sending,
    Sent(Instant),
    Failed(Instant),
}

impl ReportState {
    /// The control accepts a submission only when idle
    pub fn is_enabled(&self) -> bool {
        matches!(self, ReportState::Idle)
    }
}

#[derive(Debug, Clone)]
pub struct ModalModel {
    pub station_id: String,

    /// Name supplied by whoever opened the modal (route, marker, bookmark)
    pub caller_name: String,

    /// Resolved title shown in the header
    pub title: String,

    pub camera_index: usize,

    /// Show only the selected camera image, without the thumbnail strip
    pub fullscreen: bool,

    /// When the link was last copied
    pub copied_at: Option<Instant>,

    /// Mirror of the bookmark registry for this station
    pub starred: bool,

    pub report: ReportState,

    /// Tag for image loads started by this modal instance
    pub generation: u64,
}

impl ModalModel {
    pub fn new(station_id: String, caller_name: String, starred: bool, generation: u64) -> Self {
        let title = if caller_name.trim().is_empty() {
            station_id.clone()
        } else {
            caller_name.clone()
        };
        Self {
            station_id,
            caller_name,
            title,
            camera_index: 0,
            fullscreen: false,
            copied_at: None,
            starred,
            report: ReportState::Idle,
            generation,
        }
    }

    /// Recompute the title from the detail payload and active language
    pub fn resolve_title(&mut self, detail: Option<&StationDetail>, language: Language, list_name: Option<&str>) {
        self.title = resolve_title(
            &self.station_id,
            &self.caller_name,
            detail,
            language,
            list_name,
        );
    }

    pub fn next_camera(&mut self, camera_count: usize) {
        self.camera_index = carousel::next_index(self.camera_index, camera_count);
    }

    pub fn prev_camera(&mut self, camera_count: usize) {
        self.camera_index = carousel::prev_index(self.camera_index, camera_count);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Whether the "copied" confirmation is still showing
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| is_transient_active(now.saturating_duration_since(at), COPIED_CONFIRMATION))
            .unwrap_or(false)
    }

    /// Move to `Sending` if the control is enabled. Returns whether a
    /// request should be sent.
    pub fn begin_report(&mut self) -> bool {
        if !self.report.is_enabled() {
            return false;
        }
        self.report = ReportState::Sending;
        true
    }

    /// Record the outcome of the in-flight report
    pub fn report_resolved(&mut self, success: bool, now: Instant) {
        if self.report != ReportState::Sending {
            return;
        }
        self.report = if success {
            ReportState::Sent(now)
        } else {
            ReportState::Failed(now)
        };
    }

    /// Expire transient indicators
    pub fn tick(&mut self, now: Instant) {
        if let ReportState::Sent(at) | ReportState::Failed(at) = self.report {
            if !is_transient_active(now.saturating_duration_since(at), REPORT_INDICATOR) {
                self.report = ReportState::Idle;
            }
        }
        if self.copied_at.is_some() && !self.is_copied(now) {
            self.copied_at = None;
        }
    }

    /// Time left before the report control resets, if it is showing a result
    pub fn report_remaining(&self, now: Instant) -> Option<Duration> {
        match self.report {
            ReportState::Sent(at) | ReportState::Failed(at) => {
                Some(REPORT_INDICATOR.saturating_sub(now.saturating_duration_since(at)))
            }
            _ => None,
        }
    }
}

/// Title for a station: the localized name for `language` when the detail
/// carries one, otherwise the caller's name, the station-list name, and
/// finally the id.
pub fn resolve_title(
    station_id: &str,
    caller_name: &str,
    detail: Option<&StationDetail>,
    language: Language,
    list_name: Option<&str>,
) -> String {
    if let Some(name) = detail.and_then(|d| d.localized_name(language.code())) {
        return name.to_string();
    }
    if !caller_name.trim().is_empty() {
        return caller_name.to_string();
    }
    match list_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => station_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_with_names(names: &[(&str, &str)]) -> StationDetail {
        StationDetail {
            localized_names: names
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..StationDetail::default()
        }
    }

    fn modal() -> ModalModel {
        ModalModel::new("C01503".to_string(), "Oulu".to_string(), false, 1)
    }

    #[test]
    fn test_title_starts_as_caller_name() {
        assert_eq!(modal().title, "Oulu");
        let unnamed = ModalModel::new("C01503".to_string(), String::new(), false, 1);
        assert_eq!(unnamed.title, "C01503");
    }

    #[test]
    fn test_title_uses_localized_name() {
        let mut m = modal();
        let detail = detail_with_names(&[("fi", "Oulu, Linnanmaa"), ("en", "Oulu Linnanmaa")]);
        m.resolve_title(Some(&detail), Language::Fi, None);
        assert_eq!(m.title, "Oulu, Linnanmaa");
        m.resolve_title(Some(&detail), Language::En, None);
        assert_eq!(m.title, "Oulu Linnanmaa");
    }

    #[test]
    fn test_title_falls_back_when_locale_missing() {
        let mut m = modal();
        let detail = detail_with_names(&[("fi", "Oulu, Linnanmaa")]);
        m.resolve_title(Some(&detail), Language::En, None);
        assert_eq!(m.title, "Oulu");
    }

    #[test]
    fn test_title_uses_list_name_without_caller_name() {
        assert_eq!(resolve_title("X", "", None, Language::En, Some("Kuopio")), "Kuopio");
        assert_eq!(resolve_title("X", " ", None, Language::En, None), "X");
    }

    #[test]
    fn test_camera_navigation_wraps() {
        let mut m = modal();
        m.prev_camera(3);
        assert_eq!(m.camera_index, 2);
        m.next_camera(3);
        assert_eq!(m.camera_index, 0);
    }

    #[test]
    fn test_copied_confirmation_expires() {
        let mut m = modal();
        let t0 = Instant::now();
        m.mark_copied(t0);
        assert!(m.is_copied(t0 + Duration::from_secs(6)));
        m.tick(t0 + Duration::from_secs(7));
        assert!(!m.is_copied(t0 + Duration::from_secs(7)));
        assert!(m.copied_at.is_none());
    }

    #[test]
    fn test_report_cannot_be_resubmitted_until_reset() {
        let mut m = modal();
        let t0 = Instant::now();
        assert!(m.begin_report());
        assert!(!m.begin_report(), "disabled while sending");

        m.report_resolved(true, t0);
        assert_eq!(m.report, ReportState::Sent(t0));
        assert!(!m.begin_report(), "disabled while showing success");

        m.tick(t0 + Duration::from_millis(2999));
        assert!(!m.report.is_enabled());
        m.tick(t0 + REPORT_INDICATOR);
        assert_eq!(m.report, ReportState::Idle);
        assert!(m.begin_report());
    }

    #[test]
    fn test_failed_report_auto_clears() {
        let mut m = modal();
        let t0 = Instant::now();
        m.begin_report();
        m.report_resolved(false, t0);
        assert_eq!(m.report, ReportState::Failed(t0));
        assert_eq!(m.report_remaining(t0), Some(REPORT_INDICATOR));
        m.tick(t0 + Duration::from_secs(3));
        assert_eq!(m.report, ReportState::Idle);
    }

    #[test]
    fn test_resolution_without_request_ignored() {
        let mut m = modal();
        m.report_resolved(true, Instant::now());
        assert_eq!(m.report, ReportState::Idle);
    }
}

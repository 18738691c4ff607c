//! UI timing logic
//!
//! Pure functions deciding when transient indicators expire.

use std::time::Duration;

/// How long a toast stays on screen
pub const TOAST_DURATION_MS: u128 = 1500;

/// How long the "copied" confirmation replaces the copy-link control
pub const COPIED_CONFIRMATION: Duration = Duration::from_secs(7);

/// How long a report success/failure indicator is shown before the control resets
pub const REPORT_INDICATOR: Duration = Duration::from_secs(3);

/// Check whether a toast has been visible long enough to dismiss
///
/// # Examples
/// ```
/// use kelitui::logic::ui::should_dismiss_toast;
///
/// assert!(!should_dismiss_toast(0));
/// assert!(!should_dismiss_toast(1499));
/// assert!(should_dismiss_toast(1500));
/// ```
pub fn should_dismiss_toast(elapsed_ms: u128) -> bool {
    elapsed_ms >= TOAST_DURATION_MS
}

/// Check whether a transient indicator started `elapsed` ago is still showing
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kelitui::logic::ui::{is_transient_active, COPIED_CONFIRMATION};
///
/// assert!(is_transient_active(Duration::from_secs(6), COPIED_CONFIRMATION));
/// assert!(!is_transient_active(Duration::from_secs(7), COPIED_CONFIRMATION));
/// ```
pub fn is_transient_active(elapsed: Duration, lifetime: Duration) -> bool {
    elapsed < lifetime
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_boundary() {
        assert!(!should_dismiss_toast(TOAST_DURATION_MS - 1));
        assert!(should_dismiss_toast(TOAST_DURATION_MS));
        assert!(should_dismiss_toast(10_000));
    }

    #[test]
    fn test_report_indicator_expires() {
        assert!(is_transient_active(Duration::from_millis(2999), REPORT_INDICATOR));
        assert!(!is_transient_active(REPORT_INDICATOR, REPORT_INDICATOR));
    }

    #[test]
    fn test_copied_outlives_report_indicator() {
        assert!(COPIED_CONFIRMATION > REPORT_INDICATOR);
    }
}

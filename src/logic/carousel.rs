//! Camera carousel navigation
//!
//! Index arithmetic for the camera list of a station. All navigation wraps.

/// Index after `current` in a list of `len` items, wrapping to the start
///
/// # Examples
/// ```
/// use kelitui::logic::carousel::next_index;
///
/// assert_eq!(next_index(0, 3), 1);
/// assert_eq!(next_index(2, 3), 0);
/// assert_eq!(next_index(0, 0), 0);
/// ```
pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current.min(len - 1) + 1) % len
}

/// Index before `current` in a list of `len` items, wrapping to the end
///
/// # Examples
/// ```
/// use kelitui::logic::carousel::prev_index;
///
/// assert_eq!(prev_index(1, 3), 0);
/// assert_eq!(prev_index(0, 3), 2);
/// ```
pub fn prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current.min(len - 1) + len - 1) % len
}

/// Clamp a remembered index to a (possibly shorter) list
pub fn clamp_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        current.min(len - 1)
    }
}

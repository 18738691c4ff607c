//! UI Model
//!
//! This sub-model contains state related to the user interface that is not
//! owned by the map, modal or menu: toasts, search, and terminal quirks.

use std::time::Instant;

/// UI preferences and popups
#[derive(Clone, Debug)]
pub struct UiModel {
    /// Whether vim keybindings are enabled
    pub vim_mode: bool,

    /// Toast message (text, timestamp)
    pub toast_message: Option<(String, Instant)>,

    /// Key help overlay
    pub show_help: bool,

    // ============================================
    // SEARCH
    // ============================================
    /// Whether search input is active (receiving keystrokes)
    pub search_mode: bool,

    /// Current search query
    pub search_query: String,

    /// Highlighted result
    pub search_selected: usize,

    // ============================================
    // VISUAL STATE
    // ============================================
    /// Sixel cleanup counter (render white screen for N frames)
    pub sixel_cleanup_frames: u8,

    /// Font size for image preview (width, height)
    pub image_font_size: Option<(u16, u16)>,

    /// Whether app should quit
    pub should_quit: bool,
}

impl UiModel {
    pub fn new(vim_mode: bool) -> Self {
        Self {
            vim_mode,
            toast_message: None,
            show_help: false,
            search_mode: false,
            search_query: String::new(),
            search_selected: 0,
            sixel_cleanup_frames: 0,
            image_font_size: None,
            should_quit: false,
        }
    }

    /// Show toast message
    pub fn show_toast(&mut self, message: String) {
        self.toast_message = Some((message, Instant::now()));
    }

    /// Check if toast should be dismissed
    pub fn should_dismiss_toast(&self) -> bool {
        match &self.toast_message {
            Some((_, timestamp)) => {
                crate::logic::ui::should_dismiss_toast(timestamp.elapsed().as_millis())
            }
            None => false,
        }
    }

    pub fn dismiss_toast(&mut self) {
        self.toast_message = None;
    }

    pub fn start_search(&mut self) {
        self.search_mode = true;
        self.search_query.clear();
        self.search_selected = 0;
    }

    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_query.clear();
        self.search_selected = 0;
    }
}

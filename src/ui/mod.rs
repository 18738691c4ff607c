// UI module - handles all TUI rendering using Ratatui
//
// Architecture:
// - layout: Calculates screen layout (map, menu panel, legend, status bar)
// - render: Main orchestration function that coordinates all rendering
// - map_view: Renders the map canvas with markers and clusters
// - modal: Renders the station detail modal with camera images
// - menu: Renders the bookmark / preferences side panel
// - legend: Renders hotkey legend
// - search: Renders station search popup
// - status_bar: Renders bottom status bar
// - dialogs: Renders confirmation prompt and key help
// - toast: Renders toast notifications (brief pop-up messages)

pub mod dialogs;
pub mod layout;
pub mod legend;
pub mod map_view;
pub mod menu;
pub mod modal;
pub mod render;
pub mod search;
pub mod status_bar;
pub mod toast;

// Re-export main render function for convenience
pub use render::render;

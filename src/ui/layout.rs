use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the menu side panel
pub const MENU_WIDTH: u16 = 38;

/// Layout information for rendering
pub struct LayoutInfo {
    /// Map canvas area (including its border)
    pub map_area: Rect,
    /// Menu panel area (if open)
    pub menu_area: Option<Rect>,
    /// Hotkey legend area (full width)
    pub legend_area: Rect,
    /// Bottom status bar area
    pub status_area: Rect,
}

/// Calculate the screen layout for all UI components
pub fn calculate_layout(terminal_size: Rect, legend_height: u16, menu_open: bool) -> LayoutInfo {
    // Main layout: content area + legend + status bar (bottom)
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),                // Map (and menu)
            Constraint::Length(legend_height), // Legend area (dynamic height, exact fit for wrapped content)
            Constraint::Length(1),             // Status bar
        ])
        .split(terminal_size);

    let content_area = main_chunks[0];

    // Menu only when the map keeps a usable width next to it
    let (map_area, menu_area) = if menu_open && content_area.width >= MENU_WIDTH * 2 {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(MENU_WIDTH), Constraint::Length(MENU_WIDTH)])
            .split(content_area);
        (chunks[0], Some(chunks[1]))
    } else if menu_open {
        (content_area, Some(content_area))
    } else {
        (content_area, None)
    };

    LayoutInfo {
        map_area,
        menu_area,
        legend_area: main_chunks[1],
        status_area: main_chunks[2],
    }
}

/// Rectangle of `percent_x` x `percent_y` centred in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x.min(100) / 100;
    let height = area.height * percent_y.min(100) / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_splits_wide_terminal() {
        let layout = calculate_layout(Rect::new(0, 0, 120, 40), 3, true);
        let menu = layout.menu_area.unwrap();
        assert_eq!(menu.width, MENU_WIDTH);
        assert_eq!(layout.map_area.width, 120 - MENU_WIDTH);
        assert_eq!(layout.status_area.height, 1);
    }

    #[test]
    fn test_menu_covers_narrow_terminal() {
        let layout = calculate_layout(Rect::new(0, 0, 60, 20), 3, true);
        assert_eq!(layout.menu_area, Some(layout.map_area));
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(10, 5, 100, 50);
        let r = centered_rect(80, 60, area);
        assert_eq!(r, Rect::new(20, 15, 80, 30));
    }
}

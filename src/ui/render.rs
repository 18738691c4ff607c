use crate::App;
use ratatui::Frame;

use super::{
    dialogs, layout,
    legend::{self, LegendContext},
    map_view, menu, modal, search, status_bar, toast,
};

/// Main render function - orchestrates all UI rendering
pub fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();
    let session = &mut app.session;

    let context = if session.model.ui.search_mode {
        LegendContext::Search
    } else if session.model.modal().is_some() {
        LegendContext::Modal
    } else if session.model.menu.open {
        LegendContext::Menu
    } else {
        LegendContext::Map
    };
    let vim_mode = session.model.ui.vim_mode;

    let legend_height = legend::calculate_legend_height(size.width, vim_mode, context);
    let layout_info = layout::calculate_layout(size, legend_height, session.model.menu.open);

    map_view::render_map(f, layout_info.map_area, session);

    let session = &app.session;
    if let Some(menu_area) = layout_info.menu_area {
        menu::render_menu(f, menu_area, session);
    }

    legend::render_legend(f, layout_info.legend_area, vim_mode, context);
    status_bar::render_status_bar(f, layout_info.status_area, session);

    if session.model.ui.search_mode {
        search::render_search(f, layout_info.map_area, session);
    }

    if session.model.modal().is_some() {
        let modal_area = match layout_info.menu_area {
            Some(menu_area) => layout_info.map_area.union(menu_area),
            None => layout_info.map_area,
        };
        modal::render_modal(f, modal_area, session, &mut app.image_states);
    }

    if session.model.menu.confirm_clear {
        dialogs::render_clear_confirmation(f, session.language.get(), session.bookmarks.len());
    }

    if session.model.ui.show_help {
        dialogs::render_help(f);
    }

    // Render toast notification if active
    if let Some((message, _timestamp)) = &session.model.ui.toast_message {
        toast::render_toast(f, size, message);
    }
}

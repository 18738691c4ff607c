use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Which surface receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendContext {
    Map,
    Modal,
    Menu,
    Search,
}

fn key(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::Yellow))
}

/// Build hotkey spans (extracted for testability)
fn build_hotkey_spans(vim_mode: bool, context: LegendContext) -> Vec<Span<'static>> {
    let mut hotkey_spans = vec![];

    match context {
        LegendContext::Map => {
            if vim_mode {
                hotkey_spans.extend(vec![key("hjkl"), Span::raw(":Pan  ")]);
            } else {
                hotkey_spans.extend(vec![key("←↑↓→"), Span::raw(":Pan  ")]);
            }
            hotkey_spans.extend(vec![
                key("+/-"),
                Span::raw(":Zoom  "),
                key("Enter"),
                Span::raw(":Open  "),
                key("."),
                Span::raw(":My location  "),
                key(if vim_mode { "/" } else { "/ ^F" }),
                Span::raw(":Search  "),
                key("m"),
                Span::raw(":Menu  "),
                key("s"),
                Span::raw(":Style  "),
                key("L"),
                Span::raw(":Language  "),
                key("R"),
                Span::raw(":Reload  "),
            ]);
        }
        LegendContext::Modal => {
            hotkey_spans.extend(vec![
                key(if vim_mode { "h/l" } else { "←/→" }),
                Span::raw(":Camera  "),
                key("f"),
                Span::raw(":Fullscreen  "),
                key("c"),
                Span::raw(":Copy link  "),
                key("b"),
                Span::raw(":Bookmark  "),
                key("r"),
                Span::raw(":Report  "),
                key("Esc"),
                Span::raw(":Close  "),
            ]);
        }
        LegendContext::Menu => {
            hotkey_spans.extend(vec![
                key(if vim_mode { "j/k" } else { "↑/↓" }),
                Span::raw(":Select  "),
                key("Enter"),
                Span::raw(":Open  "),
                key("d"),
                Span::raw(":Remove  "),
                key("C"),
                Span::raw(":Clear all  "),
                key("Esc"),
                Span::raw(":Close  "),
            ]);
        }
        LegendContext::Search => {
            hotkey_spans.extend(vec![
                key("↑/↓"),
                Span::raw(":Select  "),
                key("Enter"),
                Span::raw(":Open  "),
                key("Esc"),
                Span::raw(":Exit Search"),
            ]);
            return hotkey_spans;
        }
    }

    hotkey_spans.extend(vec![key("?"), Span::raw(":Help  "), key("q"), Span::raw(":Quit")]);
    hotkey_spans
}

/// Build the legend paragraph (reusable for both rendering and height calculation)
pub fn build_legend_paragraph(vim_mode: bool, context: LegendContext) -> Paragraph<'static> {
    let hotkey_line = Line::from(build_hotkey_spans(vim_mode, context));

    Paragraph::new(vec![hotkey_line])
        .block(Block::default().borders(Borders::ALL).title("Hotkeys"))
        .style(Style::default().fg(Color::Gray))
        .wrap(ratatui::widgets::Wrap { trim: false })
}

/// Render the hotkey legend for the surface that has focus
pub fn render_legend(f: &mut Frame, area: Rect, vim_mode: bool, context: LegendContext) {
    f.render_widget(build_legend_paragraph(vim_mode, context), area);
}

/// Calculate required height for legend based on terminal width and content
pub fn calculate_legend_height(terminal_width: u16, vim_mode: bool, context: LegendContext) -> u16 {
    // Build paragraph WITHOUT block borders for accurate line counting
    // (line_count() doesn't account for borders correctly when block is attached)
    let hotkey_line = Line::from(build_hotkey_spans(vim_mode, context));
    let paragraph_for_counting =
        Paragraph::new(vec![hotkey_line]).wrap(ratatui::widgets::Wrap { trim: false });

    // Calculate available width (subtract left + right borders)
    let available_width = terminal_width.saturating_sub(2);

    // Get exact line count for wrapped text
    let line_count = paragraph_for_counting.line_count(available_width);

    // Add top + bottom borders, ensure minimum of 3
    (line_count as u16).saturating_add(2).max(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper function to convert spans to plain text for assertions
    fn spans_to_text(spans: &[Span]) -> String {
        spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect::<Vec<_>>()
            .join("")
    }

    #[test]
    fn test_map_legend_follows_vim_mode() {
        let vim = spans_to_text(&build_hotkey_spans(true, LegendContext::Map));
        let plain = spans_to_text(&build_hotkey_spans(false, LegendContext::Map));
        assert!(vim.contains("hjkl:Pan"));
        assert!(plain.contains("←↑↓→:Pan"));
        assert!(plain.contains("^F"), "non-vim users get Ctrl-F for search");
    }

    #[test]
    fn test_modal_legend_lists_station_actions() {
        let text = spans_to_text(&build_hotkey_spans(false, LegendContext::Modal));
        for action in ["Copy link", "Bookmark", "Report", "Fullscreen"] {
            assert!(text.contains(action), "missing {} in {}", action, text);
        }
    }

    #[test]
    fn test_search_legend_has_no_quit() {
        let text = spans_to_text(&build_hotkey_spans(false, LegendContext::Search));
        assert!(!text.contains(":Quit"), "q types into the query while searching");
    }

    #[test]
    fn test_narrow_terminal_wraps_legend() {
        let wide = calculate_legend_height(400, false, LegendContext::Map);
        let narrow = calculate_legend_height(40, false, LegendContext::Map);
        assert_eq!(wide, 3);
        assert!(narrow > wide);
    }
}

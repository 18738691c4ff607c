//! Menu Panel Model

#[derive(Clone, Debug, Default)]
pub struct MenuModel {
    pub open: bool,

    /// Selected row in the bookmark list
    pub selected: usize,

    /// "Remove all bookmarks?" prompt is showing
    pub confirm_clear: bool,
}

impl MenuModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.confirm_clear = false;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.confirm_clear = false;
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        let mut menu = MenuModel::new();
        menu.select_prev();
        assert_eq!(menu.selected, 0);
        menu.select_next(2);
        menu.select_next(2);
        assert_eq!(menu.selected, 1);
        menu.clamp(0);
        assert_eq!(menu.selected, 0);
    }

    #[test]
    fn test_close_cancels_confirmation() {
        let mut menu = MenuModel::new();
        menu.toggle();
        menu.confirm_clear = true;
        menu.close();
        assert!(!menu.open);
        assert!(!menu.confirm_clear);
    }
}

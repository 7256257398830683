use std::ops::Range;

/// Keyboard highlight in the always-visible identifier list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Picker {
    highlighted: usize,
}

impl Picker {
    pub const fn highlighted(self) -> usize {
        self.highlighted
    }

    /// Moves the highlight onto the current selection.
    pub fn follow(&mut self, selected: Option<usize>) {
        self.highlighted = selected.unwrap_or(0);
    }

    pub fn up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.highlighted = if self.highlighted == 0 {
            len - 1
        } else {
            (self.highlighted - 1).min(len - 1)
        };
    }

    pub fn down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.highlighted = (self.highlighted + 1) % len;
    }

    /// Rows of a `len` long list to draw in `rows` lines so the highlight stays in view.
    pub fn window(self, len: usize, rows: usize) -> Range<usize> {
        if len <= rows {
            return 0..len;
        }
        let start = (self.highlighted + 1).saturating_sub(rows);
        start..start + rows
    }
}

#[cfg(test)]
mod tests {
    use super::Picker;

    #[test]
    fn highlight_wraps_both_ways() {
        let mut picker = Picker::default();
        picker.up(3);
        assert_eq!(picker.highlighted(), 2);
        picker.down(3);
        assert_eq!(picker.highlighted(), 0);
    }

    #[test]
    fn empty_list_keeps_highlight() {
        let mut picker = Picker::default();
        picker.down(0);
        picker.up(0);
        assert_eq!(picker.highlighted(), 0);
    }

    #[test]
    fn follow_tracks_the_selection() {
        let mut picker = Picker::default();
        picker.follow(Some(4));
        assert_eq!(picker.highlighted(), 4);
        picker.follow(None);
        assert_eq!(picker.highlighted(), 0);
    }

    #[test]
    fn window_scrolls_with_the_highlight() {
        let mut picker = Picker::default();
        assert_eq!(picker.window(3, 10), 0..3);
        assert_eq!(picker.window(20, 5), 0..5);

        picker.follow(Some(12));
        assert_eq!(picker.window(20, 5), 8..13);
    }
}

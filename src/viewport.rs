//! Viewport manages the relationship between focus, selection and scroll position.
//!
//! All positions are view row indices. The viewport never looks at the rows
//! themselves; callers pass the current row count.

/// Scroll state of one log view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row
    scroll_position: usize,

    /// Viewport height in rows
    height: usize,

    /// Row with keyboard focus
    focus: Option<usize>,

    /// Selected rows, inclusive `(first, last)`
    selection: Option<(usize, usize)>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            scroll_position: 0,
            height: height.max(1),
            focus: None,
            selection: None,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set height (usually from the renderer's layout pass)
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll_position
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Forget focus, selection and scroll (view cleared).
    pub fn reset(&mut self) {
        self.scroll_position = 0;
        self.focus = None;
        self.selection = None;
    }

    /// Rows currently on screen, half-open.
    pub fn visible_rows(&self, total: usize) -> std::ops::Range<usize> {
        let end = (self.scroll_position + self.height).min(total);
        self.scroll_position.min(end)..end
    }

    pub fn is_visible(&self, index: usize, total: usize) -> bool {
        self.visible_rows(total).contains(&index)
    }

    /// Scroll the minimum amount that brings `index` on screen.
    pub fn ensure_visible(&mut self, index: usize, total: usize) {
        if index < self.scroll_position {
            self.scroll_position = index;
        } else if index >= self.scroll_position + self.height {
            self.scroll_position = index + 1 - self.height;
        }

        // Clamp scroll position
        let max_scroll = total.saturating_sub(self.height);
        self.scroll_position = self.scroll_position.min(max_scroll);
    }

    /// Focus and select a single row, scrolling it on screen. Stale indices are ignored.
    pub fn set_focus(&mut self, index: usize, total: usize) {
        if index >= total {
            return;
        }
        self.focus = Some(index);
        self.selection = Some((index, index));
        self.ensure_visible(index, total);
    }

    /// Select an inclusive row range and focus its last row.
    pub fn select_range(&mut self, first: usize, last: usize, total: usize) {
        if total == 0 {
            return;
        }
        let last_row = total - 1;
        let (first, last) = if first <= last { (first, last) } else { (last, first) };
        let (first, last) = (first.min(last_row), last.min(last_row));
        self.selection = Some((first, last));
        self.focus = Some(last);
        self.ensure_visible(last, total);
    }

    /// Focus `index` and bring it on screen, optionally centered.
    ///
    /// Returns `false` when centering was requested but fewer than half a page
    /// of rows exist below `index`; the row is still visible in that case and
    /// the caller may retry once more rows arrive. Out-of-range indices have no
    /// effect and report success.
    pub fn scroll_to_index(&mut self, index: usize, center: bool, total: usize) -> bool {
        if index >= total {
            return true;
        }

        self.focus = Some(index);
        self.selection = Some((index, index));

        let padding = self.height / 2;
        self.ensure_visible(index.saturating_sub(padding), total);
        self.ensure_visible(index, total);

        if center && index > padding {
            let wanted_bottom = index + padding;
            let max_bottom = wanted_bottom.min(total - 1);
            self.ensure_visible(max_bottom, total);
            return max_bottom == wanted_bottom;
        }
        true
    }

    /// Focus the last row and scroll it to the bottom of the screen.
    pub fn scroll_to_end(&mut self, total: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        let last = total - 1;
        self.focus = Some(last);
        self.selection = Some((last, last));
        self.scroll_position = total.saturating_sub(self.height);
    }

}

//! Rows of a log view: which source lines passed the filters, in arrival order.

/// One visible row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLine {
    pub source_index: usize,
    pub bookmarked: bool,
}

impl ViewLine {
    pub fn new(source_index: usize) -> Self {
        Self {
            source_index,
            bookmarked: false,
        }
    }
}

/// Search direction for wrap-around scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Ordered view rows. Source indices are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewProjection {
    lines: Vec<ViewLine>,
}

impl ViewProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row for a newly received source line. Returns its view index.
    pub fn push(&mut self, source_index: usize) -> usize {
        debug_assert!(self.lines.last().map_or(true, |l| l.source_index < source_index));
        self.lines.push(ViewLine::new(source_index));
        self.lines.len() - 1
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, view_index: usize) -> Option<&ViewLine> {
        self.lines.get(view_index)
    }

    pub fn source_index(&self, view_index: usize) -> Option<usize> {
        self.lines.get(view_index).map(|line| line.source_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewLine> {
        self.lines.iter()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Flip the bookmark of a row. Returns the new state, or `None` for a stale index.
    pub fn toggle_bookmark(&mut self, view_index: usize) -> Option<bool> {
        let line = self.lines.get_mut(view_index)?;
        line.bookmarked = !line.bookmarked;
        Some(line.bookmarked)
    }

    pub fn clear_bookmarks(&mut self) {
        for line in &mut self.lines {
            line.bookmarked = false;
        }
    }

    /// Source indices of bookmarked rows, ascending.
    pub fn bookmarks(&self) -> Vec<usize> {
        self.lines
            .iter()
            .filter(|line| line.bookmarked)
            .map(|line| line.source_index)
            .collect()
    }

    /// Build a new projection from the source lines that pass, keeping the
    /// bookmarks of lines that are still visible.
    ///
    /// Also returns the view index of the last row at or before `focus_line`.
    pub fn rebuild<I>(&self, passing: I, focus_line: Option<usize>) -> (Self, Option<usize>)
    where
        I: IntoIterator<Item = usize>,
    {
        let bookmarks = self.bookmarks();
        let mut bookmarks = bookmarks.iter().copied().peekable();

        let mut lines = Vec::with_capacity(self.lines.len());
        let mut focus = None;
        for source_index in passing {
            while bookmarks.next_if(|&b| b < source_index).is_some() {}
            let bookmarked = bookmarks.next_if_eq(&source_index).is_some();

            if focus_line.is_some_and(|f| source_index <= f) {
                focus = Some(lines.len());
            }
            lines.push(ViewLine {
                source_index,
                bookmarked,
            });
        }

        (Self { lines }, focus)
    }

    /// Scan rows after `start` in `direction`, wrapping around, and return the
    /// first that satisfies `pred`. `start` itself is tested last.
    pub fn find<P>(&self, start: usize, direction: Direction, mut pred: P) -> Option<usize>
    where
        P: FnMut(&ViewLine) -> bool,
    {
        let len = self.lines.len();
        if len == 0 {
            return None;
        }
        let start = start.min(len - 1);
        (1..=len)
            .map(|step| match direction {
                Direction::Forward => (start + step) % len,
                Direction::Backward => (start + len - step % len) % len,
            })
            .find(|&index| pred(&self.lines[index]))
    }

    /// `(first source line, last source line, count)` of the whole view.
    pub fn range(&self) -> Option<(usize, usize, usize)> {
        let first = self.lines.first()?;
        let last = self.lines.last()?;
        Some((first.source_index, last.source_index, self.lines.len()))
    }
}

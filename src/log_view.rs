//! A filtered, highlighted, live-tailing view over a line source.
//!
//! Lines enter through [`LogView::add`] inside a `begin_update`/`end_update`
//! batch. Classification happens per line; scrolling happens once per batch.

use crate::colors::{ColorGenerator, Rgb, TextColor};
use crate::columns::{clock_time_text, relative_time_text, Column, Columns};
use crate::filter::{classify, classifier, FilterSet, MatchKind, Rule, RuleAction, RuleCategory};
use crate::highlight::{self, tabs_to_spaces, Highlight, SearchText, NO_HIGHLIGHT, TAB_SIZE};
use crate::persist::PersistenceError;
use crate::projection::{Direction, ViewProjection};
use crate::reader::{LineSource, SourceMessage};
use crate::tail::{TailController, TailState};
use crate::viewport::Viewport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Source lines covered by a range of view rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionInfo {
    pub begin_line: usize,
    pub end_line: usize,
    pub count: usize,
}

/// Everything the renderer needs for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowData {
    pub view_index: usize,
    pub source_index: usize,
    /// Texts of the enabled columns, in display order
    pub column_texts: Vec<(Column, String)>,
    pub colors: TextColor,
    /// Spans over the tab-expanded message text
    pub highlights: Vec<Highlight>,
    pub bookmarked: bool,
}

impl RowData {
    pub fn text(&self, column: Column) -> Option<&str> {
        self.column_texts
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, text)| text.as_str())
    }
}

pub struct LogView<S: LineSource> {
    source: S,
    filters: FilterSet,
    projection: ViewProjection,
    viewport: Viewport,
    tail: TailController,
    columns: Columns,
    clock_time: bool,
    default_colors: TextColor,
    highlight_text: String,
    color_generator: ColorGenerator,
    /// Source lines before this index are hidden (after `clear`)
    first_line: usize,
    dirty: bool,
    added_lines: usize,
}

impl<S: LineSource> LogView<S> {
    pub fn new(source: S, filters: FilterSet) -> Self {
        Self {
            source,
            filters,
            projection: ViewProjection::new(),
            viewport: Viewport::default(),
            tail: TailController::new(),
            columns: Columns::default(),
            clock_time: false,
            default_colors: TextColor::window(),
            highlight_text: String::new(),
            color_generator: ColorGenerator::default(),
            first_line: 0,
            dirty: false,
            added_lines: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access for appending new messages. Call [`LogView::add`] for each.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn projection(&self) -> &ViewProjection {
        &self.projection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_height(&mut self, height: usize) {
        self.viewport.set_height(height);
    }

    pub fn len(&self) -> usize {
        self.projection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projection.is_empty()
    }

    pub fn tail_state(&self) -> TailState {
        self.tail.state()
    }

    pub fn focus(&self) -> Option<usize> {
        self.viewport.focus()
    }

    // --- Ingestion ---

    pub fn begin_update(&mut self) {
        self.added_lines = 0;
    }

    /// Classify source line `line` and append it if it passes.
    pub fn add(&mut self, line: usize) {
        if line < self.first_line {
            return;
        }
        let Some(msg) = self.source.get(line) else {
            return;
        };
        let class = classify(&mut self.filters, msg);
        if !class.included {
            return;
        }

        self.dirty = true;
        self.added_lines += 1;
        let view_index = self.projection.push(line);
        self.tail.on_line_added(view_index, class.stop, class.track);
    }

    /// Finish a batch: scroll, center on stop/track lines. Returns the number of rows added.
    pub fn end_update(&mut self) -> usize {
        let dirty = std::mem::take(&mut self.dirty);
        let outcome = self.tail.end_update(&mut self.viewport, self.projection.len(), dirty);
        if outcome.disables_track_rules() {
            self.filters.disable_action(RuleAction::Track);
        }
        self.added_lines
    }

    // --- Filters ---

    pub fn reset_filters(&mut self) {
        self.filters.reset();
    }

    /// Reclassify every visible source line from scratch.
    ///
    /// Bookmarks survive on lines that still pass; focus moves to the last
    /// passing line at or before the previously focused one.
    pub fn apply_filters(&mut self) {
        self.filters.reset();
        // Track targets are rows of the old projection.
        self.tail.stop_tracking();

        let focus_line = self
            .viewport
            .focus()
            .and_then(|row| self.projection.source_index(row));

        let count = self.source.count();
        let mut passing = Vec::new();
        for line in self.first_line..count {
            if let Some(msg) = self.source.get(line) {
                if classifier::is_included(&mut self.filters, msg) {
                    passing.push(line);
                }
            }
        }

        let (projection, focus) = self.projection.rebuild(passing, focus_line);
        self.projection = projection;
        tracing::debug!(
            lines = count - self.first_line.min(count),
            visible = self.projection.len(),
            "reclassified view"
        );

        // Following resumes with the next ingested batch
        let total = self.projection.len();
        self.viewport.reset();
        if let Some(focus) = focus {
            self.viewport.scroll_to_index(focus, false, total);
        }
    }

    /// Replace the whole filter set and reclassify.
    pub fn set_filters(&mut self, filters: FilterSet) {
        self.stop_tracking();
        self.filters = filters;
        self.apply_filters();
    }

    pub fn add_filter(&mut self, rule: Rule) {
        self.filters.add(rule);
        self.apply_filters();
    }

    pub fn remove_filter(&mut self, category: RuleCategory, index: usize) -> Option<Rule> {
        let removed = self.filters.remove(category, index)?;
        self.apply_filters();
        Some(removed)
    }

    fn shortcut_colors(&mut self, action: RuleAction) -> TextColor {
        match action {
            RuleAction::Highlight | RuleAction::Track | RuleAction::Once => {
                TextColor::new(self.color_generator.back_color(), Rgb::BLACK)
            }
            RuleAction::Token => TextColor::new(Rgb::WHITE, self.color_generator.text_color()),
            _ => TextColor::window(),
        }
    }

    /// Add a simple message rule for the current highlight text. No-op when it is empty.
    pub fn add_message_filter(&mut self, action: RuleAction) -> bool {
        if self.highlight_text.is_empty() {
            return false;
        }
        let colors = self.shortcut_colors(action);
        match Rule::message(&self.highlight_text, MatchKind::Simple, action, colors) {
            Ok(rule) => {
                self.add_filter(rule);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not add message filter");
                false
            }
        }
    }

    /// Add a simple process rule for the focused row's process name.
    pub fn add_process_filter(&mut self, action: RuleAction) -> bool {
        let Some(name) = self.focused_message().map(|msg| msg.process_name.clone()) else {
            return false;
        };
        let colors = self.shortcut_colors(action);
        match Rule::process(&name, MatchKind::Simple, action, colors) {
            Ok(rule) => {
                self.add_filter(rule);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not add process filter");
                false
            }
        }
    }

    // --- Tail control ---

    /// Follow new lines again and jump to the last row.
    pub fn resume_following(&mut self) {
        self.tail.resume(&mut self.viewport, self.projection.len());
    }

    pub fn stop_following(&mut self) {
        self.tail.pause();
    }

    /// Forget the tracked line and switch every Track rule off, so later
    /// matches no longer pull the view.
    pub fn stop_tracking(&mut self) {
        self.filters.disable_action(RuleAction::Track);
        self.tail.stop_tracking();
    }

    /// User navigation: focus a row and stop tracking. Following continues
    /// only on the last row.
    pub fn set_focus(&mut self, view_index: usize) {
        let total = self.projection.len();
        if view_index >= total {
            return;
        }
        self.stop_tracking();
        self.viewport.set_focus(view_index, total);
        self.tail.on_focus_changed(view_index, total);
    }

    fn center_on(&mut self, view_index: usize) {
        let total = self.projection.len();
        self.viewport.scroll_to_index(view_index, true, total);
        self.tail.on_focus_changed(view_index, total);
    }

    fn jump_to(&mut self, view_index: usize) {
        let total = self.projection.len();
        self.viewport.scroll_to_index(view_index, false, total);
        self.tail.on_focus_changed(view_index, total);
    }

    // --- Search ---

    pub fn highlight_text(&self) -> &str {
        &self.highlight_text
    }

    pub fn set_highlight_text(&mut self, text: impl Into<String>) {
        self.highlight_text = text.into();
    }

    pub fn find_next(&mut self, text: &str) -> bool {
        self.find(text, Direction::Forward)
    }

    pub fn find_previous(&mut self, text: &str) -> bool {
        self.find(text, Direction::Backward)
    }

    fn find(&mut self, text: &str, direction: Direction) -> bool {
        self.stop_tracking();

        let start = self.viewport.focus().unwrap_or(0);
        let search = SearchText::new(text);
        let source = &self.source;
        let Some(row) = self.projection.find(start, direction, |line| {
            source
                .get(line.source_index)
                .is_some_and(|msg| search.is_match(&msg.text))
        }) else {
            return false;
        };

        let same_row = self.viewport.focus() == Some(row);
        if !same_row {
            self.center_on(row);
        }
        if same_row && self.highlight_text == text {
            return false;
        }

        self.highlight_text = text.to_string();
        true
    }

    pub fn find_next_process(&mut self) -> bool {
        self.find_process(Direction::Forward)
    }

    pub fn find_previous_process(&mut self) -> bool {
        self.find_process(Direction::Backward)
    }

    fn find_process(&mut self, direction: Direction) -> bool {
        let Some(begin) = self.viewport.focus() else {
            return false;
        };
        let Some(name) = self.focused_message().map(|msg| msg.process_name.clone()) else {
            return false;
        };

        let source = &self.source;
        let found = self.projection.find(begin, direction, |line| {
            source
                .get(line.source_index)
                .is_some_and(|msg| msg.process_name == name)
        });
        match found {
            Some(row) if row != begin => {
                self.stop_tracking();
                self.center_on(row);
                true
            }
            _ => false,
        }
    }

    // --- Bookmarks ---

    /// Flip the bookmark on a row. `None` for a stale index.
    pub fn toggle_bookmark(&mut self, view_index: usize) -> Option<bool> {
        self.projection.toggle_bookmark(view_index)
    }

    pub fn next_bookmark(&mut self) -> bool {
        self.find_bookmark(Direction::Forward)
    }

    pub fn previous_bookmark(&mut self) -> bool {
        self.find_bookmark(Direction::Backward)
    }

    fn find_bookmark(&mut self, direction: Direction) -> bool {
        let start = self.viewport.focus().unwrap_or(0);
        match self.projection.find(start, direction, |line| line.bookmarked) {
            Some(row) => {
                self.stop_tracking();
                self.jump_to(row);
                true
            }
            None => false,
        }
    }

    pub fn clear_bookmarks(&mut self) {
        self.projection.clear_bookmarks();
    }

    /// Source indices of bookmarked rows.
    pub fn bookmarks(&self) -> Vec<usize> {
        self.projection.bookmarks()
    }

    // --- Lifecycle ---

    /// Hide everything received so far and start following again.
    pub fn clear(&mut self) {
        self.first_line = self.source.count();
        self.projection.clear();
        self.viewport.reset();
        self.tail.reset();
        self.highlight_text.clear();
        self.dirty = false;
        self.filters.reset();
    }

    pub fn select_all(&mut self) {
        let total = self.projection.len();
        if total > 0 {
            self.viewport.select_range(0, total - 1, total);
        }
    }

    pub fn select_range(&mut self, first: usize, last: usize) {
        self.viewport.select_range(first, last, self.projection.len());
    }

    pub fn selected_range(&self) -> Option<SelectionInfo> {
        let (first, last) = self.viewport.selection()?;
        Some(SelectionInfo {
            begin_line: self.projection.source_index(first)?,
            end_line: self.projection.source_index(last)?,
            count: last - first + 1,
        })
    }

    pub fn view_range(&self) -> Option<SelectionInfo> {
        let (begin_line, end_line, count) = self.projection.range()?;
        Some(SelectionInfo {
            begin_line,
            end_line,
            count,
        })
    }

    // --- Display ---

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn set_columns(&mut self, columns: Columns) {
        self.columns = columns;
    }

    pub fn toggle_column(&mut self, column: Column) {
        self.columns.toggle(column);
    }

    pub fn clock_time(&self) -> bool {
        self.clock_time
    }

    pub fn set_clock_time(&mut self, clock_time: bool) {
        self.clock_time = clock_time;
    }

    pub fn set_default_colors(&mut self, colors: TextColor) {
        self.default_colors = colors;
    }

    fn message(&self, view_index: usize) -> Option<&SourceMessage> {
        let line = self.projection.source_index(view_index)?;
        self.source.get(line)
    }

    fn focused_message(&self) -> Option<&SourceMessage> {
        self.message(self.viewport.focus()?)
    }

    fn time_text(&self, msg: &SourceMessage) -> String {
        if self.clock_time {
            clock_time_text(&msg.system_time)
        } else {
            relative_time_text(msg.time)
        }
    }

    /// Display text of one cell. The message column is tab-expanded.
    pub fn column_text(&self, view_index: usize, column: Column) -> Option<String> {
        let msg = self.message(view_index)?;
        Some(match column {
            Column::Bookmark => String::new(),
            Column::Line => (view_index + 1).to_string(),
            Column::Time => self.time_text(msg),
            Column::Pid => msg.process_id.to_string(),
            Column::Process => msg.process_name.clone(),
            Column::Message => tabs_to_spaces(&msg.text, TAB_SIZE),
        })
    }

    pub fn row(&self, view_index: usize) -> Option<RowData> {
        self.build_row(view_index, None)
    }

    /// Row data with the text selection `[begin, end)` merged over the other highlights.
    pub fn row_with_selection(&self, view_index: usize, begin: usize, end: usize) -> Option<RowData> {
        self.build_row(view_index, Some((begin, end)))
    }

    fn build_row(&self, view_index: usize, selection: Option<(usize, usize)>) -> Option<RowData> {
        let line = self.projection.get(view_index)?;
        let msg = self.source.get(line.source_index)?;

        let column_texts = self
            .columns
            .visible()
            .into_iter()
            .filter_map(|column| Some((column, self.column_text(view_index, column)?)))
            .collect();

        let text = tabs_to_spaces(&msg.text, TAB_SIZE);
        let mut highlights = highlight::index_highlights(&self.filters, &text, &self.highlight_text);
        if let Some((begin, end)) = selection {
            highlights = highlights.with_selection(begin, end);
        }

        Some(RowData {
            view_index,
            source_index: line.source_index,
            column_texts,
            colors: classifier::text_color(&self.filters, msg).unwrap_or(self.default_colors),
            highlights: highlights.spans(),
            bookmarked: line.bookmarked,
        })
    }

    /// Id of the highlight covering `offset` of a row's message, 0 if none.
    pub fn highlight_at(&self, view_index: usize, offset: usize) -> u32 {
        let Some(msg) = self.message(view_index) else {
            return NO_HIGHLIGHT;
        };
        let text = tabs_to_spaces(&msg.text, TAB_SIZE);
        highlight::index_highlights(&self.filters, &text, &self.highlight_text).id_at(offset)
    }

    /// Tab-separated line, time, pid, process and message of a row.
    pub fn item_text(&self, view_index: usize) -> Option<String> {
        let msg = self.message(view_index)?;
        Some(format!(
            "{}\t{}\t{}\t{}\t{}",
            view_index + 1,
            self.time_text(msg),
            msg.process_id,
            msg.process_name,
            msg.text
        ))
    }

    /// Write every row to `path`, one tab-separated line each.
    pub fn export(&self, path: &Path) -> Result<(), PersistenceError> {
        let file = File::create(path).map_err(|e| PersistenceError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        for row in 0..self.projection.len() {
            if let Some(text) = self.item_text(row) {
                writeln!(writer, "{text}").map_err(|e| PersistenceError::io(path, e))?;
            }
        }
        writer.flush().map_err(|e| PersistenceError::io(path, e))
    }

    /// Text for the clipboard: the highlight text, or else the selected rows.
    pub fn copy_text(&self) -> String {
        if !self.highlight_text.is_empty() {
            return self.highlight_text.clone();
        }
        let Some((first, last)) = self.viewport.selection() else {
            return String::new();
        };
        let mut text = String::new();
        for row in first..=last {
            if let Some(item) = self.item_text(row) {
                text.push_str(&item);
                text.push('\n');
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::memory_log::MemoryLog;
    use crate::test_utils::{log_of, message_rule, process_rule};
    use tempfile::tempdir;

    fn view_of(lines: &[&str], filters: FilterSet) -> LogView<MemoryLog> {
        let mut view = LogView::new(log_of(lines), filters);
        view.set_height(4);
        ingest_all(&mut view);
        view
    }

    fn ingest_all(view: &mut LogView<MemoryLog>) {
        view.begin_update();
        for line in 0..view.source().count() {
            view.add(line);
        }
        view.end_update();
    }

    fn push(view: &mut LogView<MemoryLog>, lines: &[&str]) -> usize {
        view.begin_update();
        for line in lines {
            let index = view.source_mut().push_line(line);
            view.add(index);
        }
        view.end_update()
    }

    fn visible_sources(view: &LogView<MemoryLog>) -> Vec<usize> {
        view.projection().iter().map(|l| l.source_index).collect()
    }

    #[test]
    fn test_ingest_filters_and_follows() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("noise", RuleAction::Exclude));
        let mut view = view_of(&[], filters);

        let added = push(&mut view, &["1\ta\tone", "1\ta\tnoise", "1\ta\ttwo"]);
        assert_eq!(added, 2);
        assert_eq!(visible_sources(&view), vec![0, 2]);
        assert_eq!(view.tail_state(), TailState::Following);
        assert_eq!(view.focus(), Some(1));
    }

    #[test]
    fn test_stop_line_pauses_batch() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("halt", RuleAction::Stop));
        let mut view = view_of(&[], filters);

        let lines: Vec<String> = (0..10)
            .map(|i| if i == 5 { "halt here".to_string() } else { format!("line {i}") })
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        assert_eq!(push(&mut view, &refs), 10);

        assert_eq!(view.focus(), Some(5));
        assert_ne!(view.tail_state(), TailState::Following);
    }

    #[test]
    fn test_track_rule_disabled_after_centering() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("beacon", RuleAction::Track));
        let mut view = view_of(&[], filters);

        push(&mut view, &["a", "b", "c", "beacon"]);
        assert_eq!(view.tail_state(), TailState::Tracking);
        assert!(view.filters().message_rules()[0].is_enabled());

        push(&mut view, &["d", "e"]);
        assert_eq!(view.tail_state(), TailState::Paused);
        assert_eq!(view.focus(), Some(3));
        assert!(!view.filters().message_rules()[0].is_enabled());
    }

    #[test]
    fn test_stop_tracking_without_target_disables_track_rules() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("beacon", RuleAction::Track));
        let mut view = view_of(&["a", "b", "c", "d", "e", "f"], filters);

        view.set_focus(1);
        view.stop_tracking();
        assert!(!view.filters().message_rules()[0].is_enabled());

        push(&mut view, &["beacon", "x", "y", "z"]);
        assert_eq!(view.focus(), Some(1));
        assert_eq!(view.tail_state(), TailState::Paused);
    }

    #[test]
    fn test_navigation_stops_tracking() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("beacon", RuleAction::Track));
        let mut view = view_of(&[], filters);

        // Too few rows below the beacon to center it, so tracking stays on
        push(&mut view, &["a", "b", "c", "beacon"]);
        assert_eq!(view.tail_state(), TailState::Tracking);

        view.set_focus(0);
        assert_eq!(view.tail_state(), TailState::Paused);
        assert!(!view.filters().message_rules()[0].is_enabled());
    }

    #[test]
    fn test_apply_filters_restores_focus_while_following() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("a", RuleAction::Include));
        let mut view = view_of(&["a0", "b1", "a2", "b3"], filters);
        assert_eq!(visible_sources(&view), vec![0, 2]);
        assert_eq!(view.focus(), Some(1));
        assert_eq!(view.tail_state(), TailState::Following);

        view.remove_filter(RuleCategory::Message, 0);
        assert_eq!(visible_sources(&view), vec![0, 1, 2, 3]);
        assert_eq!(view.focus(), Some(2));

        // Following picks up again with the next batch
        push(&mut view, &["a4"]);
        assert_eq!(view.focus(), Some(4));
    }

    #[test]
    fn test_apply_filters_keeps_bookmarks_and_focus() {
        let mut view = view_of(&["a 0", "b 1", "a 2", "b 3", "a 4"], FilterSet::new());
        view.toggle_bookmark(2);
        view.toggle_bookmark(3);
        view.set_focus(3);

        view.add_filter(message_rule("a", RuleAction::Include));
        assert_eq!(visible_sources(&view), vec![0, 2, 4]);
        assert_eq!(view.bookmarks(), vec![2]);
        assert_eq!(view.focus(), Some(1));
    }

    #[test]
    fn test_apply_filters_resets_once_rules() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("hello", RuleAction::Once));
        let mut view = view_of(&["hello", "hello", "bye"], filters);
        assert_eq!(visible_sources(&view), vec![0, 2]);

        view.apply_filters();
        assert_eq!(visible_sources(&view), vec![0, 2]);
    }

    #[test]
    fn test_clear_hides_existing_lines() {
        let mut view = view_of(&["a", "b"], FilterSet::new());
        view.set_highlight_text("a");
        view.stop_following();
        view.clear();

        assert!(view.is_empty());
        assert_eq!(view.highlight_text(), "");
        assert_eq!(view.tail_state(), TailState::Following);

        push(&mut view, &["c"]);
        assert_eq!(visible_sources(&view), vec![2]);
        view.apply_filters();
        assert_eq!(visible_sources(&view), vec![2]);
    }

    #[test]
    fn test_find_next_wraps_and_sets_highlight() {
        let mut view = view_of(&["alpha", "Beta", "gamma", "beta again"], FilterSet::new());
        view.set_focus(1);

        assert!(view.find_next("BETA"));
        assert_eq!(view.focus(), Some(3));
        assert_eq!(view.highlight_text(), "BETA");

        assert!(view.find_next("BETA"));
        assert_eq!(view.focus(), Some(1));

        assert!(view.find_previous("beta"));
        assert_eq!(view.focus(), Some(3));

        assert!(!view.find_next("missing"));
    }

    #[test]
    fn test_find_same_row_only_sets_highlight_once() {
        let mut view = view_of(&["only match", "other"], FilterSet::new());
        view.set_focus(0);
        assert!(view.find_next("match"));
        assert_eq!(view.focus(), Some(0));
        assert!(!view.find_next("match"));
    }

    #[test]
    fn test_find_process() {
        let mut view = view_of(
            &["1\tsvc\ta", "2\tui\tb", "1\tsvc\tc", "2\tui\td"],
            FilterSet::new(),
        );
        view.set_focus(0);
        assert!(view.find_next_process());
        assert_eq!(view.focus(), Some(2));
        assert!(view.find_previous_process());
        assert_eq!(view.focus(), Some(0));

        let mut lonely = view_of(&["1\tsvc\ta", "2\tui\tb"], FilterSet::new());
        lonely.set_focus(0);
        assert!(!lonely.find_next_process());
    }

    #[test]
    fn test_bookmark_navigation() {
        let mut view = view_of(&["a", "b", "c", "d"], FilterSet::new());
        assert_eq!(view.toggle_bookmark(9), None);
        assert!(!view.next_bookmark());

        view.toggle_bookmark(1);
        view.toggle_bookmark(3);
        view.set_focus(1);
        assert!(view.next_bookmark());
        assert_eq!(view.focus(), Some(3));
        assert!(view.next_bookmark());
        assert_eq!(view.focus(), Some(1));
        assert!(view.previous_bookmark());
        assert_eq!(view.focus(), Some(3));

        view.clear_bookmarks();
        assert!(view.bookmarks().is_empty());
    }

    #[test]
    fn test_focus_change_pauses_following() {
        let mut view = view_of(&["a", "b", "c"], FilterSet::new());
        view.set_focus(0);
        assert_eq!(view.tail_state(), TailState::Paused);

        push(&mut view, &["d"]);
        assert_eq!(view.focus(), Some(0));

        view.resume_following();
        assert_eq!(view.focus(), Some(3));
        assert_eq!(view.tail_state(), TailState::Following);
    }

    #[test]
    fn test_add_message_filter_from_highlight() {
        let mut view = view_of(&["keep", "drop me", "keep too"], FilterSet::new());
        assert!(!view.add_message_filter(RuleAction::Exclude));

        view.set_highlight_text("drop");
        assert!(view.add_message_filter(RuleAction::Exclude));
        assert_eq!(visible_sources(&view), vec![0, 2]);
        assert_eq!(view.filters().message_rules()[0].colors(), TextColor::window());
    }

    #[test]
    fn test_add_process_filter_from_focus() {
        let mut view = view_of(&["1\tsvc\ta", "2\tui\tb"], FilterSet::new());
        view.set_focus(1);
        assert!(view.add_process_filter(RuleAction::Token));

        let rule = &view.filters().process_rules()[0];
        assert_eq!(rule.pattern(), "ui");
        assert_eq!(rule.colors().back, Rgb::WHITE);
    }

    #[test]
    fn test_row_data() {
        let mut filters = FilterSet::new();
        filters.add(
            Rule::message("err", MatchKind::Simple, RuleAction::Highlight, TextColor::new(Rgb(1, 2, 3), Rgb::BLACK))
                .unwrap(),
        );
        filters.add(message_rule("disk", RuleAction::Token));
        let mut view = view_of(&["7\tsvc\terr\tdisk full", "7\tsvc\tfine"], filters);
        view.set_clock_time(false);

        let row = view.row(0).unwrap();
        assert_eq!(row.text(Column::Line), Some("1"));
        assert_eq!(row.text(Column::Pid), Some("7"));
        assert_eq!(row.text(Column::Message), Some("err disk full"));
        assert_eq!(row.colors.back, Rgb(1, 2, 3));
        assert_eq!(row.highlights.len(), 1);
        assert_eq!((row.highlights[0].begin, row.highlights[0].end), (4, 8));
        assert_eq!(view.highlight_at(0, 5), 2);
        assert_eq!(view.highlight_at(0, 0), 0);

        assert_eq!(view.row(1).unwrap().colors, TextColor::window());
        assert!(view.row(2).is_none());
    }

    #[test]
    fn test_non_ascii_row_offsets_are_characters() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("disk", RuleAction::Token));
        let view = view_of(&["9\tsvc\tnaïve\tdisk"], filters);

        let row = view.row(0).unwrap();
        assert_eq!(row.text(Column::Message), Some("naïve   disk"));
        assert_eq!((row.highlights[0].begin, row.highlights[0].end), (8, 12));
        assert_eq!(view.highlight_at(0, 8), 2);
        assert_eq!(view.highlight_at(0, 7), 0);
    }

    #[test]
    fn test_row_with_selection_overrides() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("disk", RuleAction::Token));
        let view = view_of(&["disk full"], filters);

        let row = view.row_with_selection(0, 3, 1).unwrap();
        let spans: Vec<(u32, usize, usize)> = row.highlights.iter().map(|h| (h.id, h.begin, h.end)).collect();
        assert_eq!(spans, vec![(2, 0, 1), (0, 1, 3)]);
    }

    #[test]
    fn test_ranges() {
        let mut filters = FilterSet::new();
        filters.add(message_rule("x", RuleAction::Exclude));
        let mut view = view_of(&["a", "x", "b", "c"], filters);

        assert_eq!(
            view.view_range(),
            Some(SelectionInfo { begin_line: 0, end_line: 3, count: 3 })
        );
        view.select_range(0, 1);
        assert_eq!(
            view.selected_range(),
            Some(SelectionInfo { begin_line: 0, end_line: 2, count: 2 })
        );
    }

    #[test]
    fn test_copy_text() {
        let mut view = view_of(&["1\tp\ta", "2\tq\tb"], FilterSet::new());
        view.select_all();
        let text = view.copy_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1\t"));
        assert!(lines[1].ends_with("\t2\tq\tb"));

        view.set_highlight_text("needle");
        assert_eq!(view.copy_text(), "needle");
    }

    #[test]
    fn test_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let view = view_of(&["1\tp\tone", "1\tp\ttwo"], FilterSet::new());

        view.export(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().all(|l| l.split('\t').count() == 5));

        let missing = dir.path().join("no").join("such").join("dir.txt");
        assert!(matches!(view.export(&missing), Err(PersistenceError::Io { .. })));
    }

    #[test]
    fn test_set_filters_replaces_rules() {
        let mut view = view_of(&["a", "b"], FilterSet::new());
        let mut filters = FilterSet::new();
        filters.add(process_rule("nobody", RuleAction::Include));
        view.set_filters(filters);
        assert!(view.is_empty());
    }
}

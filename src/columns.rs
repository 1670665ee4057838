//! Column layout of a log view and per-column text formatting.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Bookmark,
    Line,
    Time,
    Pid,
    Process,
    Message,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Bookmark,
        Column::Line,
        Column::Time,
        Column::Pid,
        Column::Process,
        Column::Message,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Bookmark => "",
            Column::Line => "Line",
            Column::Time => "Time",
            Column::Pid => "PID",
            Column::Process => "Process",
            Column::Message => "Message",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Bookmark => "bookmark",
            Column::Line => "line",
            Column::Time => "time",
            Column::Pid => "pid",
            Column::Process => "process",
            Column::Message => "message",
        }
    }

    /// Numeric columns are right-aligned.
    pub fn right_aligned(self) -> bool {
        matches!(self, Column::Bookmark | Column::Line | Column::Time | Column::Pid)
    }

    fn default_width(self) -> u32 {
        match self {
            Column::Bookmark => 20,
            Column::Line => 60,
            Column::Time => 90,
            Column::Pid => 60,
            Column::Process => 140,
            Column::Message => 1500,
        }
    }

    fn position(self) -> usize {
        Column::ALL.iter().position(|&c| c == self).unwrap_or(0)
    }
}

/// Layout of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column: Column,
    pub enable: bool,
    pub width: u32,
    pub order: i32,
}

impl ColumnInfo {
    pub fn new(column: Column) -> Self {
        Self {
            column,
            enable: true,
            width: column.default_width(),
            order: column.position() as i32,
        }
    }
}

/// All columns of a view, one entry per [`Column`] in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    infos: [ColumnInfo; 6],
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            infos: Column::ALL.map(ColumnInfo::new),
        }
    }
}

impl Columns {
    /// Defaults overridden by the given entries. Later entries for the same column win.
    pub fn from_infos<'a, I>(infos: I) -> Self
    where
        I: IntoIterator<Item = &'a ColumnInfo>,
    {
        let mut columns = Self::default();
        for info in infos {
            columns.infos[info.column.position()] = *info;
        }
        columns
    }

    pub fn info(&self, column: Column) -> &ColumnInfo {
        &self.infos[column.position()]
    }

    pub fn infos(&self) -> &[ColumnInfo] {
        &self.infos
    }

    pub fn is_enabled(&self, column: Column) -> bool {
        self.info(column).enable
    }

    /// Show or hide a column, shifting the display order of the columns after it.
    pub fn toggle(&mut self, column: Column) {
        let pos = column.position();
        self.infos[pos].enable = !self.infos[pos].enable;
        let delta = if self.infos[pos].enable { 1 } else { -1 };
        let order = self.infos[pos].order;

        for (i, info) in self.infos.iter_mut().enumerate() {
            if i != pos && info.order >= order {
                info.order += delta;
            }
        }
    }

    /// Enabled columns in display order.
    pub fn visible(&self) -> Vec<Column> {
        let mut visible: Vec<&ColumnInfo> = self.infos.iter().filter(|info| info.enable).collect();
        visible.sort_by_key(|info| info.order);
        visible.into_iter().map(|info| info.column).collect()
    }
}

/// Seconds since capture start, six decimals.
pub fn relative_time_text(time: f64) -> String {
    format!("{time:.6}")
}

/// Wall-clock time of day with milliseconds, e.g. `9:05:03.120`.
pub fn clock_time_text(time: &DateTime<Local>) -> String {
    time.format("%-H:%M:%S%.3f").to_string()
}

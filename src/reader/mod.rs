pub mod memory_log;

use chrono::{DateTime, Local};

/// One captured debug message.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMessage {
    pub text: String,
    pub process_name: String,
    pub process_id: u32,
    /// Seconds since capture started.
    pub time: f64,
    pub system_time: DateTime<Local>,
}

impl SourceMessage {
    pub fn new(text: impl Into<String>, process_name: impl Into<String>, process_id: u32) -> Self {
        Self {
            text: text.into(),
            process_name: process_name.into(),
            process_id,
            time: 0.0,
            system_time: Local::now(),
        }
    }
}

/// Append-only store of messages addressed by a stable index.
pub trait LineSource {
    /// Number of messages received so far
    fn count(&self) -> usize;

    /// Get a message by index
    fn get(&self, index: usize) -> Option<&SourceMessage>;
}

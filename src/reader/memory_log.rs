use super::{LineSource, SourceMessage};
use anyhow::Result;
use chrono::Local;
use std::io::BufRead;
use std::time::Instant;

/// In-memory message store fed line by line (pipes, files read up front, tests).
pub struct MemoryLog {
    messages: Vec<SourceMessage>,
    started: Instant,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Read every line of `reader` (blocking) and store it as a message.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut log = Self::new();
        for line in reader.lines() {
            log.push_line(&line?);
        }
        Ok(log)
    }

    /// Store a message as is. Returns its index.
    pub fn push(&mut self, message: SourceMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Parse a captured line and stamp it with the current time. Returns its index.
    pub fn push_line(&mut self, line: &str) -> usize {
        let (process_id, process_name, text) = parse_line(line);
        self.push(SourceMessage {
            text: text.to_string(),
            process_name: process_name.to_string(),
            process_id,
            time: self.started.elapsed().as_secs_f64(),
            system_time: Local::now(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for MemoryLog {
    fn count(&self) -> usize {
        self.messages.len()
    }

    fn get(&self, index: usize) -> Option<&SourceMessage> {
        self.messages.get(index)
    }
}

/// Split a `pid<TAB>process<TAB>message` line.
///
/// Lines without that shape are messages of an unknown process (pid 0, empty name).
pub fn parse_line(line: &str) -> (u32, &str, &str) {
    let mut parts = line.splitn(3, '\t');
    if let (Some(pid), Some(process), Some(text)) = (parts.next(), parts.next(), parts.next()) {
        if let Ok(pid) = pid.trim().parse::<u32>() {
            return (pid, process, text);
        }
    }
    (0, "", line)
}

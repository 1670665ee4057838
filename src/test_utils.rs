use crate::colors::TextColor;
use crate::filter::{MatchKind, Rule, RuleAction};
use crate::reader::memory_log::MemoryLog;

/// In-memory line source holding `lines`, parsed like captured input.
pub fn log_of(lines: &[&str]) -> MemoryLog {
    let mut log = MemoryLog::new();
    for line in lines {
        log.push_line(line);
    }
    log
}

/// Simple message-text rule with window colors.
pub fn message_rule(pattern: &str, action: RuleAction) -> Rule {
    Rule::message(pattern, MatchKind::Simple, action, TextColor::window()).unwrap()
}

/// Simple process-name rule with window colors.
pub fn process_rule(pattern: &str, action: RuleAction) -> Rule {
    Rule::process(pattern, MatchKind::Simple, action, TextColor::window()).unwrap()
}

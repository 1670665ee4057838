//! A single filter rule: pattern, match kind, action and display colors.

use crate::colors::{Rgb, TextColor};
use regex::{Matches, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a rule's pattern is turned into a matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Case-insensitive substring containment.
    Simple,
    /// `*` / `?` glob, anchored to the whole text.
    Wildcard,
    /// Case-insensitive regular expression.
    #[default]
    Regex,
}

impl MatchKind {
    pub const ALL: [MatchKind; 3] = [MatchKind::Simple, MatchKind::Wildcard, MatchKind::Regex];

    pub fn name(self) -> &'static str {
        match self {
            MatchKind::Simple => "simple",
            MatchKind::Wildcard => "wildcard",
            MatchKind::Regex => "regex",
        }
    }

    /// Regex source equivalent to `pattern` under this match kind.
    fn regex_source(self, pattern: &str) -> String {
        match self {
            MatchKind::Simple => regex::escape(pattern),
            MatchKind::Wildcard => wildcard_to_regex(pattern),
            MatchKind::Regex => pattern.to_string(),
        }
    }
}

/// Which field of a source message a rule tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Message,
    Process,
}

/// What a matching rule does to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// Allow-list entry; once any is enabled, unmatched messages are hidden.
    Include,
    /// Hide matching messages.
    Exclude,
    /// Color matching rows.
    Highlight,
    /// Keep the view centered on the latest match.
    Track,
    /// Pause following and center on the match.
    Stop,
    /// Show only the first match since the last reset.
    Once,
    /// Color each matched substring.
    Token,
}

impl RuleAction {
    pub const ALL: [RuleAction; 7] = [
        RuleAction::Include,
        RuleAction::Exclude,
        RuleAction::Highlight,
        RuleAction::Track,
        RuleAction::Stop,
        RuleAction::Once,
        RuleAction::Token,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleAction::Include => "include",
            RuleAction::Exclude => "exclude",
            RuleAction::Highlight => "highlight",
            RuleAction::Track => "track",
            RuleAction::Stop => "stop",
            RuleAction::Once => "once",
            RuleAction::Token => "token",
        }
    }

    /// Whether a match of this action colors the whole row.
    pub fn colors_row(self) -> bool {
        matches!(
            self,
            RuleAction::Include
                | RuleAction::Highlight
                | RuleAction::Track
                | RuleAction::Stop
                | RuleAction::Once
        )
    }
}

/// A pattern that could not be compiled into a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter pattern '{pattern}': {reason}")]
pub struct FilterRuleError {
    pub reason: String,
    pub pattern: String,
}

/// Serializable description of a rule, as stored in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub match_kind: MatchKind,
    pub action: RuleAction,
    #[serde(default = "default_background")]
    pub background: Rgb,
    #[serde(default = "default_foreground")]
    pub foreground: Rgb,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_background() -> Rgb {
    Rgb::WHITE
}

fn default_foreground() -> Rgb {
    Rgb::BLACK
}

fn default_enabled() -> bool {
    true
}

/// A compiled filter rule.
///
/// `match_count` is only advanced by `Once` rules and goes back to zero on
/// [`Rule::reset`].
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    match_kind: MatchKind,
    category: RuleCategory,
    action: RuleAction,
    colors: TextColor,
    enabled: bool,
    match_count: u32,
    regex: Regex,
}

impl Rule {
    pub fn new(
        pattern: &str,
        match_kind: MatchKind,
        category: RuleCategory,
        action: RuleAction,
        colors: TextColor,
    ) -> Result<Self, FilterRuleError> {
        let regex = RegexBuilder::new(&match_kind.regex_source(pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| FilterRuleError {
                reason: e.to_string(),
                pattern: pattern.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            match_kind,
            category,
            action,
            colors,
            enabled: true,
            match_count: 0,
            regex,
        })
    }

    /// Shorthand for a message-text rule.
    pub fn message(
        pattern: &str,
        match_kind: MatchKind,
        action: RuleAction,
        colors: TextColor,
    ) -> Result<Self, FilterRuleError> {
        Self::new(pattern, match_kind, RuleCategory::Message, action, colors)
    }

    /// Shorthand for a process-name rule.
    pub fn process(
        pattern: &str,
        match_kind: MatchKind,
        action: RuleAction,
        colors: TextColor,
    ) -> Result<Self, FilterRuleError> {
        Self::new(pattern, match_kind, RuleCategory::Process, action, colors)
    }

    pub fn from_config(config: &RuleConfig, category: RuleCategory) -> Result<Self, FilterRuleError> {
        let mut rule = Self::new(
            &config.pattern,
            config.match_kind,
            category,
            config.action,
            TextColor::new(config.background, config.foreground),
        )?;
        rule.enabled = config.enabled;
        Ok(rule)
    }

    pub fn to_config(&self) -> RuleConfig {
        RuleConfig {
            pattern: self.pattern.clone(),
            match_kind: self.match_kind,
            action: self.action,
            background: self.colors.back,
            foreground: self.colors.fore,
            enabled: self.enabled,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// True if the rule is enabled and its pattern occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.enabled && self.regex.is_match(text)
    }

    /// All non-overlapping matches of the pattern in `text`.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        self.regex.find_iter(text)
    }

    /// Count a `Once` match. Returns true on the first match since the last reset.
    pub(crate) fn register_once_match(&mut self) -> bool {
        self.match_count = self.match_count.saturating_add(1);
        self.match_count == 1
    }

    pub fn reset(&mut self) {
        self.match_count = 0;
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn match_kind(&self) -> MatchKind {
        self.match_kind
    }

    pub fn category(&self) -> RuleCategory {
        self.category
    }

    pub fn action(&self) -> RuleAction {
        self.action
    }

    pub fn colors(&self) -> TextColor {
        self.colors
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn match_count(&self) -> u32 {
        self.match_count
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category && self.to_config() == other.to_config()
    }
}

/// Translate a `*` / `?` glob into an anchored regex source.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    source.push('$');
    source
}

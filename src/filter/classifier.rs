//! Per-message decisions: inclusion, row colors, stop and track signals.
//!
//! Message-text rules are tested against `SourceMessage::text`, process rules
//! against `SourceMessage::process_name`. Each action has its own function;
//! [`classify`] bundles them for the ingestion path.

use super::filter_set::FilterSet;
use super::rule::{Rule, RuleAction, RuleCategory};
use crate::colors::TextColor;
use crate::reader::SourceMessage;

/// Everything the view needs to know about a freshly received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub included: bool,
    /// Colors of the first matching coloring rule, if any.
    pub colors: Option<TextColor>,
    pub stop: bool,
    pub track: bool,
}

fn field<'m>(category: RuleCategory, msg: &'m SourceMessage) -> &'m str {
    match category {
        RuleCategory::Message => &msg.text,
        RuleCategory::Process => &msg.process_name,
    }
}

/// Inclusion decision for one rule list.
///
/// 1. Default-allow unless an enabled `Include` rule exists; then any matching
///    `Include` rule allows.
/// 2. A matching `Exclude` rule hides the text.
/// 3. The first matching `Once` rule counts the match and decides on its own:
///    shown on its first match since the last reset, hidden after that.
pub fn is_included_by(rules: &mut [Rule], text: &str) -> bool {
    let mut include_present = false;
    let mut included = false;
    for rule in rules.iter().filter(|r| r.is_enabled() && r.action() == RuleAction::Include) {
        include_present = true;
        included |= rule.matches(text);
    }
    if !include_present {
        included = true;
    }

    let excluded = rules
        .iter()
        .any(|r| r.action() == RuleAction::Exclude && r.matches(text));

    if let Some(once) = rules
        .iter_mut()
        .find(|r| r.action() == RuleAction::Once && r.matches(text))
    {
        return once.register_once_match();
    }

    included && !excluded
}

/// A message passes when both its text and its process name pass.
///
/// Process rules are not consulted (and their `Once` counters not advanced)
/// for messages already rejected by the message rules.
pub fn is_included(filters: &mut FilterSet, msg: &SourceMessage) -> bool {
    is_included_by(filters.rules_mut(RuleCategory::Message), &msg.text)
        && is_included_by(filters.rules_mut(RuleCategory::Process), &msg.process_name)
}

/// Colors of the first enabled coloring rule that matches, message rules first.
pub fn text_color(filters: &FilterSet, msg: &SourceMessage) -> Option<TextColor> {
    filters
        .iter()
        .find(|r| r.action().colors_row() && r.matches(field(r.category(), msg)))
        .map(Rule::colors)
}

fn any_action_matches(filters: &FilterSet, action: RuleAction, msg: &SourceMessage) -> bool {
    filters
        .iter()
        .any(|r| r.action() == action && r.matches(field(r.category(), msg)))
}

/// True if an enabled `Stop` rule matches either field.
pub fn is_stop(filters: &FilterSet, msg: &SourceMessage) -> bool {
    any_action_matches(filters, RuleAction::Stop, msg)
}

/// True if an enabled `Track` rule matches either field.
pub fn is_track(filters: &FilterSet, msg: &SourceMessage) -> bool {
    any_action_matches(filters, RuleAction::Track, msg)
}

/// Run every decision for one message. Stop/track/colors are only evaluated
/// for included messages.
pub fn classify(filters: &mut FilterSet, msg: &SourceMessage) -> Classification {
    if !is_included(filters, msg) {
        return Classification {
            included: false,
            colors: None,
            stop: false,
            track: false,
        };
    }
    Classification {
        included: true,
        colors: text_color(filters, msg),
        stop: is_stop(filters, msg),
        track: is_track(filters, msg),
    }
}

use super::rule::{FilterRuleError, Rule, RuleAction, RuleCategory, RuleConfig};
use serde::{Deserialize, Serialize};

/// Serializable form of a [`FilterSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSetConfig {
    #[serde(default)]
    pub message_filters: Vec<RuleConfig>,
    #[serde(default)]
    pub process_filters: Vec<RuleConfig>,
}

/// Ordered message-text rules and process-name rules of one log view.
///
/// Rule order matters: the first enabled coloring rule decides a row's colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    message_rules: Vec<Rule>,
    process_rules: Vec<Rule>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from configuration, compiling every rule.
    ///
    /// Rules that fail to compile are left out and reported; the remaining
    /// rules still load.
    pub fn from_config(config: &FilterSetConfig) -> (Self, Vec<FilterRuleError>) {
        let mut set = Self::new();
        let mut errors = Vec::new();

        let lists = [
            (RuleCategory::Message, &config.message_filters),
            (RuleCategory::Process, &config.process_filters),
        ];
        for (category, rules) in lists {
            for rule_config in rules {
                match Rule::from_config(rule_config, category) {
                    Ok(rule) => set.add(rule),
                    Err(e) => {
                        tracing::warn!(pattern = %e.pattern, reason = %e.reason, "rejected filter rule");
                        errors.push(e);
                    }
                }
            }
        }

        (set, errors)
    }

    pub fn to_config(&self) -> FilterSetConfig {
        FilterSetConfig {
            message_filters: self.message_rules.iter().map(Rule::to_config).collect(),
            process_filters: self.process_rules.iter().map(Rule::to_config).collect(),
        }
    }

    /// Append a rule to the list of its category.
    pub fn add(&mut self, rule: Rule) {
        self.rules_mut(rule.category()).push(rule);
    }

    /// Remove the rule at `index` of a category's list.
    pub fn remove(&mut self, category: RuleCategory, index: usize) -> Option<Rule> {
        let rules = self.rules_mut(category);
        (index < rules.len()).then(|| rules.remove(index))
    }

    pub fn rules(&self, category: RuleCategory) -> &[Rule] {
        match category {
            RuleCategory::Message => &self.message_rules,
            RuleCategory::Process => &self.process_rules,
        }
    }

    pub fn rules_mut(&mut self, category: RuleCategory) -> &mut Vec<Rule> {
        match category {
            RuleCategory::Message => &mut self.message_rules,
            RuleCategory::Process => &mut self.process_rules,
        }
    }

    pub fn message_rules(&self) -> &[Rule] {
        &self.message_rules
    }

    pub fn process_rules(&self) -> &[Rule] {
        &self.process_rules
    }

    /// Message rules first, then process rules.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.message_rules.iter().chain(self.process_rules.iter())
    }

    pub fn len(&self) -> usize {
        self.message_rules.len() + self.process_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restart `Once` rules so their next match counts as the first again.
    pub fn reset(&mut self) {
        self.message_rules
            .iter_mut()
            .chain(self.process_rules.iter_mut())
            .filter(|rule| rule.action() == RuleAction::Once)
            .for_each(Rule::reset);
    }

    /// Disable every enabled rule with the given action. Returns how many changed.
    pub fn disable_action(&mut self, action: RuleAction) -> usize {
        let mut disabled = 0;
        for rule in self
            .message_rules
            .iter_mut()
            .chain(self.process_rules.iter_mut())
            .filter(|rule| rule.action() == action && rule.is_enabled())
        {
            rule.set_enabled(false);
            disabled += 1;
        }
        disabled
    }
}

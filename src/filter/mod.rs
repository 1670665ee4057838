pub mod classifier;
pub mod filter_set;
pub mod rule;

pub use classifier::{classify, Classification};
pub use filter_set::{FilterSet, FilterSetConfig};
pub use rule::{FilterRuleError, MatchKind, Rule, RuleAction, RuleCategory, RuleConfig};

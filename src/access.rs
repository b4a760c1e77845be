//! Access transformers: widening class, field and method access.

mod rules;
mod transform;

pub use rules::{read, read_file, AccessRule, AccessRuleSet, FinalAction, RuleTarget, Visibility};
pub use transform::AccessTransformer;

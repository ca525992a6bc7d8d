//! Rule registry.

pub mod no_array_mutations_on_state;

pub use no_array_mutations_on_state::NoArrayMutationsOptions;

/// How a rule classifies what it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Code that is likely to misbehave at runtime.
    Problem,
    /// Code that works but could be written better.
    Suggestion,
}

/// Static description of a rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    pub name: &'static str,
    pub kind: RuleKind,
    pub description: &'static str,
    pub category: &'static str,
    /// Whether the rule is enabled when a project has no configuration.
    pub recommended: bool,
    /// Whether the rule can produce code fixes.
    pub fixable: bool,
}

/// Every rule this crate ships.
pub const RULES: &[RuleMeta] = &[no_array_mutations_on_state::META];

/// Looks up a rule by name.
pub fn find(name: &str) -> Option<&'static RuleMeta> {
    RULES.iter().find(|rule| rule.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_rule() {
        let rule = find("no-array-mutations-on-state").unwrap();
        assert_eq!(rule.kind, RuleKind::Problem);
        assert!(rule.fixable);
        assert!(!rule.recommended);
        assert!(find("no-such-rule").is_none());
    }
}

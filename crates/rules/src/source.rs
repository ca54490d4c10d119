//! Rule sources: where the compiler's input rules come from.

use rowguard_core::Rule;

/// Action that matches every action.
pub const MANAGE_ACTION: &str = "manage";

/// Subject that matches every subject.
pub const ALL_SUBJECTS: &str = "all";

/// Supplies the ordered rules relevant to an action on a subject type.
///
/// The compiler does no action/subject matching of its own; it compiles
/// whatever the source returns.
pub trait RuleSource {
    fn rules_for(&self, action: &str, subject: &str) -> Vec<Rule>;
}

impl<F> RuleSource for F
where
    F: Fn(&str, &str) -> Vec<Rule>,
{
    fn rules_for(&self, action: &str, subject: &str) -> Vec<Rule> {
        self(action, subject)
    }
}

/// In-memory, ordered rule set.
///
/// A rule applies to a request when one of its actions equals the requested
/// action or is [`MANAGE_ACTION`], and one of its subjects equals the
/// requested subject or is [`ALL_SUBJECTS`]. Matching rules are returned in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicySet {
    rules: Vec<Rule>,
}

impl PolicySet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleSource for PolicySet {
    fn rules_for(&self, action: &str, subject: &str) -> Vec<Rule> {
        self.rules
            .iter()
            .filter(|rule| applies(rule, action, subject))
            .cloned()
            .collect()
    }
}

impl FromIterator<Rule> for PolicySet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Rule> for PolicySet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

fn applies(rule: &Rule, action: &str, subject: &str) -> bool {
    let action_matches = rule
        .action
        .iter()
        .any(|a| a == action || a == MANAGE_ACTION);
    let subject_matches = rule
        .subject
        .iter()
        .any(|s| s == subject || s == ALL_SUBJECTS);
    action_matches && subject_matches
}

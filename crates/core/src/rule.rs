//! Permission rule data model.
//!
//! A [`Rule`] is one allow or deny assertion for an action/subject pair,
//! optionally narrowed by flat field conditions. Rules are produced by a
//! rule source and only ever read by the compiler.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Flat mapping from field name to a literal or a single-level operator object.
///
/// Insertion order is preserved so that compilation (and error reporting)
/// is deterministic.
pub type Conditions = IndexMap<String, Value>;

/// A single allow (`inverted = false`) or deny (`inverted = true`) rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    #[serde(default, deserialize_with = "one_or_many")]
    pub action: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub subject: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inverted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Rule {
    /// An allow rule for `action` on `subject`.
    pub fn allow(action: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            action: vec![action.into()],
            subject: vec![subject.into()],
            ..Self::default()
        }
    }

    /// A deny rule for `action` on `subject`.
    pub fn deny(action: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            inverted: true,
            ..Self::allow(action, subject)
        }
    }

    /// Add one field condition, keeping previously added fields in order.
    pub fn when(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .get_or_insert_with(Conditions::new)
            .insert(field.into(), value.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_deny(&self) -> bool {
        self.inverted
    }

    /// True when the rule carries no field conditions at all.
    pub fn is_unconditioned(&self) -> bool {
        self.conditions.as_ref().map_or(true, |c| c.is_empty())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.inverted { "cannot" } else { "can" };
        write!(f, "{} {} {}", verb, self.action.join("|"), self.subject.join("|"))
    }
}

/// Accept either `"read"` or `["read", "update"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

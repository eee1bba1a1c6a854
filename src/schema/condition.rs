//! Activity conditions and forbidden parameter combinations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Assignment, Value};

/// Activation rule: the owning child parameter is active while the parent
/// holds one of the allowed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualsCondition {
    /// Identifier of the parent parameter.
    pub parent: String,
    /// Parent values that activate the child.
    pub allowed_values: Vec<Value>,
}

impl EqualsCondition {
    pub fn new(parent: impl Into<String>, allowed_values: Vec<Value>) -> Self {
        Self {
            parent: parent.into(),
            allowed_values,
        }
    }

    /// Whether the parent's value in `assignment` is one of the allowed values.
    ///
    /// A parent missing from the assignment never meets the condition.
    pub fn is_met(&self, assignment: &Assignment) -> bool {
        assignment
            .get(&self.parent)
            .is_some_and(|value| self.allowed_values.contains(value))
    }
}

/// Conjunctive rule marking a joint assignment as illegal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForbiddenCombination {
    /// Required identifier/value pairs.
    pub assignment: Assignment,
}

impl ForbiddenCombination {
    pub fn new(assignment: Assignment) -> Self {
        Self { assignment }
    }

    /// Identifiers taking part in this combination.
    pub fn parameter_identifiers(&self) -> impl Iterator<Item = &str> {
        self.assignment.keys().map(String::as_str)
    }

    /// Whether every pair of the combination holds in `assignment`.
    pub fn is_met(&self, assignment: &Assignment) -> bool {
        self.assignment
            .iter()
            .all(|(identifier, value)| assignment.get(identifier) == Some(value))
    }
}

impl fmt::Display for ForbiddenCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (identifier, value)) in self.assignment.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", identifier, value)?;
        }
        f.write_str("}")
    }
}

//! Parameter configuration space specification.
//!
//! Aggregates the parameters of a target algorithm, the conditions under
//! which parameters are active, and the combinations of values that are
//! forbidden. A [`Specification`] is validated once on construction and is
//! immutable afterwards, so it can be shared read-only between threads.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{Assignment, EqualsCondition, ForbiddenCombination, ParameterNode};

/// Activity conditions keyed by child identifier.
pub type ActivityConditions = BTreeMap<String, Vec<EqualsCondition>>;

/// Validated parameter configuration space.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SpecificationParts")]
pub struct Specification {
    parameters: Vec<ParameterNode>,
    activity_conditions: ActivityConditions,
    forbidden_combinations: Vec<ForbiddenCombination>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// Unvalidated specification contents, as read from serialized form.
#[derive(Debug, Deserialize)]
struct SpecificationParts {
    parameters: Vec<ParameterNode>,
    #[serde(default)]
    activity_conditions: ActivityConditions,
    #[serde(default)]
    forbidden_combinations: Vec<ForbiddenCombination>,
}

impl TryFrom<SpecificationParts> for Specification {
    type Error = SpecificationError;

    fn try_from(parts: SpecificationParts) -> Result<Self, Self::Error> {
        Self::new(
            parts.parameters,
            parts.activity_conditions,
            parts.forbidden_combinations,
        )
    }
}

/// Referential integrity errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecificationError {
    #[error("No parameters have been given")]
    NoParameters,
    #[error("Parameter '{0}' is defined more than once")]
    DuplicateParameter(String),
    #[error("Condition on undefined child '{0}'")]
    UnknownConditionChild(String),
    #[error("Condition of '{child}' depends on undefined parent '{parent}'")]
    UnknownConditionParent { child: String, parent: String },
    #[error("Condition of '{child}' on '{parent}' has no allowed values and can never be met")]
    EmptyCondition { child: String, parent: String },
    #[error("Forbidden combination {index} references undefined parameter '{identifier}'")]
    UnknownForbiddenParameter { index: usize, identifier: String },
    #[error("Forbidden combination {0} does not contain any parameters")]
    EmptyForbiddenCombination(usize),
}

impl Specification {
    /// Create a specification, checking that every identifier referenced by a
    /// condition or forbidden combination names exactly one parameter.
    pub fn new(
        parameters: Vec<ParameterNode>,
        activity_conditions: ActivityConditions,
        forbidden_combinations: Vec<ForbiddenCombination>,
    ) -> Result<Self, SpecificationError> {
        if parameters.is_empty() {
            return Err(SpecificationError::NoParameters);
        }

        let mut index = HashMap::with_capacity(parameters.len());
        for (i, parameter) in parameters.iter().enumerate() {
            if index.insert(parameter.identifier.clone(), i).is_some() {
                return Err(SpecificationError::DuplicateParameter(
                    parameter.identifier.clone(),
                ));
            }
        }

        for (child, conditions) in &activity_conditions {
            if !index.contains_key(child) {
                return Err(SpecificationError::UnknownConditionChild(child.clone()));
            }
            for condition in conditions {
                if !index.contains_key(&condition.parent) {
                    return Err(SpecificationError::UnknownConditionParent {
                        child: child.clone(),
                        parent: condition.parent.clone(),
                    });
                }
                if condition.allowed_values.is_empty() {
                    return Err(SpecificationError::EmptyCondition {
                        child: child.clone(),
                        parent: condition.parent.clone(),
                    });
                }
            }
        }

        for (i, combination) in forbidden_combinations.iter().enumerate() {
            if combination.assignment.is_empty() {
                return Err(SpecificationError::EmptyForbiddenCombination(i));
            }
            if let Some(identifier) = combination
                .parameter_identifiers()
                .find(|identifier| !index.contains_key(*identifier))
            {
                return Err(SpecificationError::UnknownForbiddenParameter {
                    index: i,
                    identifier: identifier.to_string(),
                });
            }
        }

        Ok(Self {
            parameters,
            activity_conditions,
            forbidden_combinations,
            index,
        })
    }

    /// All parameters, in definition order.
    pub fn parameters(&self) -> &[ParameterNode] {
        &self.parameters
    }

    /// Look up a parameter by identifier.
    pub fn parameter(&self, identifier: &str) -> Option<&ParameterNode> {
        self.index.get(identifier).map(|&i| &self.parameters[i])
    }

    pub fn activity_conditions(&self) -> &ActivityConditions {
        &self.activity_conditions
    }

    /// Conditions governing one parameter; empty for unconditional parameters.
    pub fn conditions_of(&self, identifier: &str) -> &[EqualsCondition] {
        self.activity_conditions
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn forbidden_combinations(&self) -> &[ForbiddenCombination] {
        &self.forbidden_combinations
    }

    /// Whether a parameter is active given the full assignment.
    ///
    /// Conditions are disjunctive: a parameter is active if it has no
    /// conditions or at least one of them is met.
    pub fn is_active(&self, identifier: &str, full_assignment: &Assignment) -> bool {
        let conditions = self.conditions_of(identifier);
        conditions.is_empty()
            || conditions
                .iter()
                .any(|condition| condition.is_met(full_assignment))
    }

    /// Restrict an assignment to the currently active parameters.
    ///
    /// Conditions are evaluated against the unrestricted assignment, so parent
    /// values are visible regardless of the parent's own activity.
    pub fn extract_active_parameters(&self, full_assignment: &Assignment) -> Assignment {
        full_assignment
            .iter()
            .filter(|(identifier, _)| self.is_active(identifier, full_assignment))
            .map(|(identifier, value)| (identifier.clone(), value.clone()))
            .collect()
    }
}

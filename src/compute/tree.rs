//! Parameter tree and genome storage.
//!
//! The tree built from a [`Specification`] is a flat AND-node over all
//! parameters: every parameter is always reachable, and activity is decided
//! by the specification's conditions instead.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{Assignment, ParameterNode, Specification, Value};

use super::genome::Mutator;

/// Identifier-keyed gene store of one candidate configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    genes: Assignment,
}

impl Genome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a gene.
    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.genes.get(identifier)
    }

    /// Set the value of a gene, returning the previous value.
    pub fn set(&mut self, identifier: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.genes.insert(identifier.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// All genes, including those of parameters unknown to any tree.
    pub fn genes(&self) -> &Assignment {
        &self.genes
    }

    /// Genes of the parameters reachable in `tree`.
    pub fn filtered_genes(&self, tree: &ParameterTree) -> Assignment {
        self.genes
            .iter()
            .filter(|(identifier, _)| tree.contains(identifier))
            .map(|(identifier, value)| (identifier.clone(), value.clone()))
            .collect()
    }
}

impl From<Assignment> for Genome {
    fn from(genes: Assignment) -> Self {
        Self { genes }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (identifier, value)) in self.genes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", identifier, value)?;
        }
        f.write_str("]")
    }
}

/// Lookup structure over the parameters of a space.
#[derive(Debug, Clone)]
pub struct ParameterTree {
    parameters: Vec<ParameterNode>,
    index: HashMap<String, usize>,
}

impl ParameterTree {
    /// Build the tree with every parameter of the specification as a child of
    /// the root.
    pub fn from_specification(specification: &Specification) -> Self {
        Self::from_parameters(specification.parameters().to_vec())
    }

    /// Build the tree from a parameter list. Later duplicates shadow earlier
    /// ones in lookups.
    pub fn from_parameters(parameters: Vec<ParameterNode>) -> Self {
        let index = parameters
            .iter()
            .enumerate()
            .map(|(i, p)| (p.identifier.clone(), i))
            .collect();
        Self { parameters, index }
    }

    pub fn parameters(&self) -> &[ParameterNode] {
        &self.parameters
    }

    /// Look up a parameter node by identifier.
    pub fn node(&self, identifier: &str) -> Option<&ParameterNode> {
        self.index.get(identifier).map(|&i| &self.parameters[i])
    }

    #[inline]
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Structural validity: every parameter has a gene, and every gene lies in
    /// its parameter's domain.
    pub fn is_genome_valid(&self, genome: &Genome) -> bool {
        self.parameters.iter().all(|parameter| {
            genome
                .get(&parameter.identifier)
                .is_some_and(|value| parameter.domain.contains(value))
        })
    }

    /// Structural repair: mutate every gene that is missing or outside its
    /// domain. Valid genes are left untouched.
    pub fn repair_genome<M: Mutator + ?Sized>(&self, genome: &mut Genome, mutator: &mut M) {
        for parameter in &self.parameters {
            let valid = genome
                .get(&parameter.identifier)
                .is_some_and(|value| parameter.domain.contains(value));
            if !valid {
                mutator.mutate(genome, parameter);
            }
        }
    }
}

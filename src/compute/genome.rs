//! Random genome generation and gene mutation.

use rand::prelude::*;

use crate::schema::{Domain, MutationMethod, ParameterNode, Value};

use super::tree::{Genome, ParameterTree};

/// Capability that changes a single gene of a genome in place.
pub trait Mutator {
    /// Replace the gene of `parameter` with a new valid value.
    fn mutate(&mut self, genome: &mut Genome, parameter: &ParameterNode);
}

/// Capability for uniform choices.
pub trait Randomizer {
    /// Uniform index in `0..len`. `len` is non-zero.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Uniformly choose one element, or `None` for an empty slice.
    fn choose_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.choose_index(items.len())])
        }
    }
}

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
    method: MutationMethod,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            method: MutationMethod::default(),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            method: MutationMethod::default(),
        }
    }

    /// Set the mutation method used by [`Mutator::mutate`].
    pub fn with_mutation(mut self, method: MutationMethod) -> Self {
        self.method = method;
        self
    }

    /// Generate a random genome covering every parameter of the tree.
    pub fn random_genome(&mut self, tree: &ParameterTree) -> Genome {
        let mut genome = Genome::new();
        for parameter in tree.parameters() {
            genome.set(parameter.identifier.clone(), self.sample(&parameter.domain));
        }
        genome
    }

    /// Draw a random member of a domain.
    pub fn sample(&mut self, domain: &Domain) -> Value {
        domain.sample(&mut self.rng)
    }

    /// Gaussian mutation: add noise scaled by the domain width and clamp
    /// into the domain. Log domains are perturbed in log space.
    ///
    /// Values of the wrong kind and categorical domains are resampled.
    pub fn gaussian_mutate(&mut self, value: &Value, strength: f64, domain: &Domain) -> Value {
        let noise: f64 = self.rng.sample(rand_distr::StandardNormal);
        match (domain, value) {
            (Domain::Float { min, max }, Value::Float(v)) => {
                Value::Float((v + noise * strength * (max - min)).clamp(*min, *max))
            }
            (Domain::LogFloat { min, max }, Value::Float(v)) if *v > 0.0 => {
                let (lo, hi) = (min.ln(), max.ln());
                let mutated = (v.ln() + noise * strength * (hi - lo)).exp();
                Value::Float(mutated.clamp(*min, *max))
            }
            (Domain::Integer { min, max }, Value::Integer(v)) => {
                let width = (*max as f64) - (*min as f64);
                let mutated = (*v as f64 + noise * strength * width).round() as i64;
                Value::Integer(mutated.clamp(*min, *max))
            }
            (Domain::LogInteger { min, max }, Value::Integer(v)) if *v > 0 => {
                let (lo, hi) = ((*min as f64).ln(), (*max as f64).ln());
                let mutated = ((*v as f64).ln() + noise * strength * (hi - lo))
                    .exp()
                    .round() as i64;
                Value::Integer(mutated.clamp(*min, *max))
            }
            _ => self.sample(domain),
        }
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}

impl Mutator for GenomeRng {
    fn mutate(&mut self, genome: &mut Genome, parameter: &ParameterNode) {
        let value = match (self.method, genome.get(&parameter.identifier)) {
            (MutationMethod::Gaussian { strength }, Some(current)) => {
                let current = current.clone();
                self.gaussian_mutate(&current, strength, &parameter.domain)
            }
            _ => self.sample(&parameter.domain),
        };
        genome.set(parameter.identifier.clone(), value);
    }
}

impl Randomizer for GenomeRng {
    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

//! Validity checking and repair of genomes against a specification.
//!
//! A genome is valid if it is structurally valid (every gene lies in its
//! domain) and no forbidden combination is met by its active genes. Invalid
//! genomes are repaired by repeatedly mutating a random parameter of the
//! first forbidden combination that is still met, until none is met or the
//! attempt budget is spent.

use log::{debug, trace};
use rayon::prelude::*;

use crate::schema::{ForbiddenCombination, MutationMethod, RepairConfig, Specification};

use super::genome::{GenomeRng, Mutator, Randomizer};
use super::tree::{Genome, ParameterTree};

/// Repair failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepairError {
    #[error(
        "Tried to make the genome {genome} valid by mutating parameters in forbidden combinations {attempts} times, but failed. Current forbidden combination: {combination}"
    )]
    Exhausted {
        attempts: usize,
        genome: Genome,
        combination: ForbiddenCombination,
    },
    #[error("Parameter '{0}' of a forbidden combination is not part of the parameter tree")]
    MissingTreeNode(String),
    #[error("No parameter of forbidden combination {0} was chosen for mutation")]
    NoParameterChosen(ForbiddenCombination),
}

/// Validity and repair engine for one parameter space.
///
/// Holds only shared references, so one engine can serve many threads.
#[derive(Debug, Clone, Copy)]
pub struct RepairEngine<'a> {
    specification: &'a Specification,
    tree: &'a ParameterTree,
    max_repair_attempts: usize,
    mutation: MutationMethod,
}

impl<'a> RepairEngine<'a> {
    pub fn new(
        specification: &'a Specification,
        tree: &'a ParameterTree,
        config: &RepairConfig,
    ) -> Self {
        Self {
            specification,
            tree,
            max_repair_attempts: config.max_repair_attempts,
            mutation: config.mutation,
        }
    }

    /// Check structural validity and the absence of met forbidden combinations.
    pub fn is_valid(&self, genome: &Genome) -> bool {
        if !self.tree.is_genome_valid(genome) {
            return false;
        }
        self.find_forbidden_combination(genome).is_none()
    }

    /// First forbidden combination, in specification order, that is met by
    /// the genome's active genes.
    pub fn find_forbidden_combination(&self, genome: &Genome) -> Option<&'a ForbiddenCombination> {
        let active = self
            .specification
            .extract_active_parameters(&genome.filtered_genes(self.tree));
        self.specification
            .forbidden_combinations()
            .iter()
            .find(|combination| combination.is_met(&active))
    }

    /// Repair the genome in place.
    ///
    /// Only parameters of met forbidden combinations are mutated, one at a
    /// time, rescanning all combinations after every mutation. Afterwards
    /// structurally invalid genes are repaired.
    pub fn make_valid<M, R>(
        &self,
        genome: &mut Genome,
        mutator: &mut M,
        randomizer: &mut R,
    ) -> Result<(), RepairError>
    where
        M: Mutator + ?Sized,
        R: Randomizer,
    {
        let mut attempts = 0;
        while let Some(combination) = self.find_forbidden_combination(genome) {
            if attempts == 0 {
                debug!("Repairing genome {}", genome);
            }

            attempts += 1;
            if attempts > self.max_repair_attempts {
                return Err(RepairError::Exhausted {
                    attempts: self.max_repair_attempts,
                    genome: genome.clone(),
                    combination: combination.clone(),
                });
            }

            let identifiers: Vec<&str> = combination.parameter_identifiers().collect();
            let Some(&identifier) = randomizer.choose_one(&identifiers) else {
                return Err(RepairError::NoParameterChosen(combination.clone()));
            };
            let node = self
                .tree
                .node(identifier)
                .ok_or_else(|| RepairError::MissingTreeNode(identifier.to_string()))?;

            trace!("Mutating '{}' to resolve {}", identifier, combination);
            mutator.mutate(genome, node);
        }

        if attempts > 0 {
            debug!("Repaired forbidden combinations in genome, now {}", genome);
        }

        self.tree.repair_genome(genome, mutator);
        Ok(())
    }

    /// Repair many genomes in parallel, each with its own random stream
    /// derived from `seed` and the configured mutation method.
    pub fn make_population_valid(
        &self,
        genomes: &mut [Genome],
        seed: u64,
    ) -> Vec<Result<(), RepairError>> {
        let mut seeder = GenomeRng::new(seed);
        let seeds: Vec<u64> = genomes.iter().map(|_| seeder.next_seed()).collect();

        genomes
            .par_iter_mut()
            .zip(seeds)
            .map(|(genome, seed)| {
                let mut rng = GenomeRng::new(seed).with_mutation(self.mutation);
                let mut randomizer = GenomeRng::new(seed.rotate_left(32));
                self.make_valid(genome, &mut rng, &mut randomizer)
            })
            .collect()
    }
}

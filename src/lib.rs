//! PCS parameter spaces - Conditional search spaces for algorithm tuning.
//!
//! This crate reads parameter configuration space (PCS) files describing
//! categorical and numerical parameters, activity conditions between them
//! and forbidden value combinations, and repairs candidate configurations
//! (genomes) so they respect those rules.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Domains, conditions, the validated specification and repair configuration
//! - `compute`: PCS parsing, the parameter tree, random genomes and repair
//!
//! # Example
//!
//! ```rust,no_run
//! use pcs_space::{
//!     compute::{parse, GenomeRng, ParameterTree, RepairEngine},
//!     schema::RepairConfig,
//! };
//!
//! let specification = parse("params.pcs").unwrap();
//! let tree = ParameterTree::from_specification(&specification);
//! let engine = RepairEngine::new(&specification, &tree, &RepairConfig::default());
//!
//! let mut rng = GenomeRng::new(42);
//! let mut randomizer = GenomeRng::new(43);
//! let mut genome = rng.random_genome(&tree);
//! engine.make_valid(&mut genome, &mut rng, &mut randomizer).unwrap();
//!
//! assert!(engine.is_valid(&genome));
//! println!("Valid genome: {}", genome);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Genome, GenomeRng, ParameterTree, ParseError, RepairEngine, RepairError, parse};
pub use schema::{Domain, RepairConfig, Specification, Value};

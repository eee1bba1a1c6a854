//! Compute module - Parsing, genome generation and repair.

mod genome;
mod parser;
mod repair;
mod tree;

pub use genome::*;
pub use parser::*;
pub use repair::*;
pub use tree::*;

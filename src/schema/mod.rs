//! Schema module - Parameter space and configuration types.

mod condition;
mod config;
mod domain;
mod specification;
mod value;

pub use condition::*;
pub use config::*;
pub use domain::*;
pub use specification::*;
pub use value::*;

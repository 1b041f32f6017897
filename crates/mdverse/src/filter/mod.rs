//! Column constraints and the predicates built from them.

mod constraint;
mod predicate;

pub use constraint::{Constraint, FilterSpec, FilterValue};
pub use predicate::{all_match, build, Predicate};

//! Constraint derivation and dependency list reconciliation: modifier
//! ranges, ordered overwrite of `project.dependencies`, extras group
//! handling.

pub mod range;
pub mod reconcile;

//! High-level, user-facing entry points.
//!
//! These tie the [`crate::core`] pieces together into complete procedures:
//! [`assemble`] turns an mmCIF source into a resolved, chain-remapped
//! structure, and [`mutate`] dispatches a named residue substitution to its
//! builder.

pub mod assemble;
pub mod mutate;

//! # varmod Core Library
//!
//! A library for turning crystallographic mmCIF structures into clean,
//! simulation-ready coordinate models, and for introducing specific point
//! mutations by deterministic geometric reconstruction of missing heavy atoms.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a strict dependency direction:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomRecord`,
//!   `ChainMap`), streaming I/O for the mmCIF `_atom_site` loop and the legacy
//!   fixed-column PDB format, pure geometric primitives (axis-angle rotation,
//!   Jacobi eigen-decomposition, PCA plane fitting), and the three
//!   residue-substitution builders.
//!
//! - **[`workflows`]: The Public API.** Thin, user-facing entry points that
//!   compose the core pieces into complete procedures: assembling a resolved
//!   structure from a file and dispatching a named substitution to its builder.
//!
//! Every transform in the library is a pure function over immutable inputs;
//! nothing retains cross-call state, and all failures are surfaced as typed
//! errors rather than partial results.

pub mod core;
pub mod workflows;

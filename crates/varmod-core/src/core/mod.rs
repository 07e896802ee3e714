//! # Core Module
//!
//! The computational core of varmod: data structures and pure algorithms for
//! structure assembly, point mutation, and geometric plane fitting.
//!
//! ## Overview
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the pipeline:
//!
//! - **Molecular Representation** ([`models`]) - Immutable atom records, the
//!   altloc/model resolver, chain-id remapping, and residue selections
//! - **File I/O** ([`io`]) - Streaming mmCIF `_atom_site` reading and
//!   fixed-column PDB writing/reading
//! - **Geometry** ([`geometry`]) - Vector/rotation primitives, a symmetric
//!   3x3 Jacobi eigen-solver, and PCA plane fitting
//! - **Mutations** ([`mutation`]) - The three residue-substitution builders
//!   (MET->VAL, ALA->THR, ARG->HIS)

pub mod geometry;
pub mod io;
pub mod models;
pub mod mutation;

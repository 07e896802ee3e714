//! Data structures representing a resolved atomic model.
//!
//! This module contains the canonical per-atom record type, the
//! alternate-location/model resolver that reduces raw `_atom_site` rows to
//! exactly one atom per key, the chain-id remapper targeting the legacy
//! single-character namespace, and the residue selection used to scope
//! mutations.

pub mod atom;
pub mod chain;
pub mod resolver;
pub mod selection;

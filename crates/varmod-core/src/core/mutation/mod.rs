//! Residue-level point substitutions.
//!
//! Each builder is a pure transform over the full record sequence, scoped to
//! one residue by a [`ResidueSelection`]. The shared control flow is
//! two-phase: the first pass validates that the geometric anchor atoms exist
//! (degrading to a rename-and-drop pass when they do not), the second pass
//! rebuilds the record sequence atom by atom, splicing synthesized atoms in
//! immediately after their anchor. No output is produced before the
//! preconditions hold, so a failed mutation never leaves a partial residue.

pub mod ala_to_thr;
pub mod arg_to_his;
pub mod met_to_val;

use crate::core::geometry::GeometryError;
use crate::core::models::atom::{AtomRecord, RecordKind};
use crate::core::models::selection::ResidueSelection;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("no atoms match residue {selection}")]
    ResidueNotFound { selection: ResidueSelection },
    #[error("degenerate geometry while rebuilding side chain: {0}")]
    Geometry(#[from] GeometryError),
    #[error("no builder for substitution '{0}'")]
    UnsupportedSubstitution(String),
}

/// Collects the atoms of the selected residue.
///
/// # Errors
///
/// Returns [`MutationError::ResidueNotFound`] when the selection matches
/// nothing.
pub(crate) fn residue_atoms<'a>(
    records: &'a [AtomRecord],
    selection: &ResidueSelection,
) -> Result<Vec<&'a AtomRecord>, MutationError> {
    let atoms: Vec<&AtomRecord> = records.iter().filter(|r| selection.matches(r)).collect();
    if atoms.is_empty() {
        return Err(MutationError::ResidueNotFound {
            selection: selection.clone(),
        });
    }
    Ok(atoms)
}

/// Indexes residue atoms by trimmed upper-case name.
pub(crate) fn atoms_by_name<'a>(atoms: &[&'a AtomRecord]) -> HashMap<String, &'a AtomRecord> {
    atoms.iter().map(|r| (r.name_upper(), *r)).collect()
}

/// The next free atom id across the whole record set.
pub(crate) fn next_atom_id(records: &[AtomRecord]) -> usize {
    records.iter().map(|r| r.atom_id).max().unwrap_or(0) + 1
}

/// A synthesized heavy atom, inheriting chain, segment, residue position,
/// occupancy, and B-factor from its anchor.
pub(crate) fn synthesized(
    anchor: &AtomRecord,
    atom_id: usize,
    res_name: &str,
    atom_name: &str,
    element: &str,
    position: Point3<f64>,
) -> AtomRecord {
    AtomRecord {
        kind: RecordKind::Standard,
        atom_id,
        element: element.to_string(),
        res_name: res_name.to_string(),
        chain_auth: anchor.chain_auth.clone(),
        chain_out: anchor.chain_out,
        segment: anchor.segment.clone(),
        res_seq: anchor.res_seq,
        ins_code: anchor.ins_code,
        atom_name: atom_name.to_string(),
        position,
        occupancy: anchor.occupancy,
        b_factor: anchor.b_factor,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A residue laid out with plausible geometry for builder tests: the
    /// backbone sits near the origin with CB along +x from CA.
    pub fn residue(chain: &str, res_seq: isize, res_name: &str, names: &[&str]) -> Vec<AtomRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| AtomRecord {
                kind: RecordKind::Standard,
                atom_id: i + 1,
                element: name
                    .chars()
                    .next()
                    .unwrap_or('C')
                    .to_ascii_uppercase()
                    .to_string(),
                res_name: res_name.to_string(),
                chain_auth: chain.to_string(),
                chain_out: chain.chars().next().unwrap_or('?'),
                segment: chain.to_string(),
                res_seq,
                ins_code: None,
                atom_name: name.to_string(),
                position: default_position(name),
                occupancy: 1.0,
                b_factor: 20.0,
            })
            .collect()
    }

    fn default_position(name: &str) -> Point3<f64> {
        match name {
            "N" => Point3::new(-1.46, 0.0, 0.0),
            "CA" => Point3::new(0.0, 0.0, 0.0),
            "C" => Point3::new(0.53, 1.42, 0.0),
            "O" => Point3::new(-0.2, 2.4, 0.0),
            "CB" => Point3::new(1.53, -0.4, -0.6),
            "CG" => Point3::new(2.6, -1.3, 0.0),
            "SD" => Point3::new(4.1, -1.9, -0.6),
            "CE" => Point3::new(5.2, -2.9, 0.3),
            "CD" => Point3::new(3.9, -2.0, -0.4),
            "NE" => Point3::new(4.9, -2.9, 0.2),
            "CZ" => Point3::new(6.1, -3.2, -0.3),
            "NH1" => Point3::new(6.4, -2.8, -1.5),
            "NH2" => Point3::new(7.0, -3.9, 0.4),
            _ => Point3::new(0.5, 0.5, 0.5),
        }
    }

    pub fn names(records: &[AtomRecord]) -> Vec<String> {
        records.iter().map(|r| r.name_upper()).collect()
    }
}

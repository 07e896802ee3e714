use super::{MutationError, atoms_by_name, next_atom_id, residue_atoms, synthesized};
use crate::core::geometry::{
    fallback_reference, rotate_about_axis, second_fallback_reference, unit,
};
use crate::core::models::atom::AtomRecord;
use crate::core::models::selection::ResidueSelection;
use std::f64::consts::PI;

/// cos(109.47 deg) = -1/3: the axial component of a tetrahedral direction.
const TETRAHEDRAL_ALONG: f64 = -1.0 / 3.0;
/// sqrt(8)/3: the matching in-plane component.
const TETRAHEDRAL_PERP: f64 = 2.0 * std::f64::consts::SQRT_2 / 3.0;

/// Approximate heavy-atom bond lengths in Angstroms.
const CB_OG_BOND: f64 = 1.43;
const CB_CG_BOND: f64 = 1.53;

/// Substitutes alanine with threonine at the selected residue.
///
/// Requires CA and CB; all retained atoms are renamed to THR, and the two
/// missing side-chain heavy atoms (OG1 and CG2) are synthesized along the
/// two tetrahedral directions around CB that the CA bond leaves free. The
/// in-plane reference comes from whichever of N/C/O exists at the backbone,
/// falling back to an arbitrary non-parallel axis. Without CA or CB the
/// builder renames only.
pub fn apply(
    records: &[AtomRecord],
    selection: &ResidueSelection,
) -> Result<Vec<AtomRecord>, MutationError> {
    let target = residue_atoms(records, selection)?;
    let by_name = atoms_by_name(&target);

    let (Some(ca), Some(cb)) = (by_name.get("CA").copied(), by_name.get("CB").copied()) else {
        return Ok(records
            .iter()
            .map(|r| {
                if selection.matches(r) {
                    r.with_res_name("THR")
                } else {
                    r.clone()
                }
            })
            .collect());
    };

    let axis = unit(&(ca.position - cb.position))?;

    let reference = ["N", "C", "O"]
        .iter()
        .find_map(|name| by_name.get(*name))
        .map(|a| a.position - ca.position)
        .unwrap_or_else(|| fallback_reference(&axis));

    let mut perp = axis.cross(&reference);
    if perp.norm() < 1e-6 {
        perp = axis.cross(&second_fallback_reference(&axis));
    }
    let perp1 = unit(&perp)?;
    let perp2 = rotate_about_axis(&perp1, &axis, 2.0 * PI / 3.0);

    let dir_og1 = axis.as_ref() * TETRAHEDRAL_ALONG + perp1.as_ref() * TETRAHEDRAL_PERP;
    let dir_cg2 = axis.as_ref() * TETRAHEDRAL_ALONG + perp2 * TETRAHEDRAL_PERP;

    let first_id = next_atom_id(records);
    let og1 = synthesized(
        cb,
        first_id,
        "THR",
        "OG1",
        "O",
        cb.position + dir_og1 * CB_OG_BOND,
    );
    let cg2 = synthesized(
        cb,
        first_id + 1,
        "THR",
        "CG2",
        "C",
        cb.position + dir_cg2 * CB_CG_BOND,
    );

    let mut mutated = Vec::with_capacity(records.len() + 2);
    let mut inserted = false;
    for r in records {
        if !selection.matches(r) {
            mutated.push(r.clone());
            continue;
        }
        let name = r.name_upper();
        mutated.push(r.with_res_name("THR"));
        if !inserted && name == "CB" {
            mutated.push(og1.clone());
            mutated.push(cg2.clone());
            inserted = true;
        }
    }
    if !inserted {
        mutated.push(og1);
        mutated.push(cg2);
    }

    Ok(mutated)
}

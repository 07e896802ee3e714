use super::{MutationError, atoms_by_name, next_atom_id, residue_atoms, synthesized};
use crate::core::geometry::{rotate_about_axis, unit};
use crate::core::models::atom::AtomRecord;
use crate::core::models::selection::ResidueSelection;
use phf::{Set, phf_set};
use std::f64::consts::PI;

/// Methionine atoms made obsolete by the substitution.
static RETIRED: Set<&'static str> = phf_set! { "SD", "CE" };

/// Substitutes methionine with valine at the selected residue.
///
/// The sulfur and epsilon carbon are dropped and CG becomes CG1. When CA, CB
/// and CG are all present, the second branch carbon CG2 is synthesized by
/// rotating the CB->CG vector 120 degrees about the CB->CA axis; otherwise
/// the builder degrades to the rename-and-drop pass and leaves rebuilding to
/// downstream tools.
pub fn apply(
    records: &[AtomRecord],
    selection: &ResidueSelection,
) -> Result<Vec<AtomRecord>, MutationError> {
    let target = residue_atoms(records, selection)?;
    let by_name = atoms_by_name(&target);

    let anchors = match (by_name.get("CA"), by_name.get("CB"), by_name.get("CG")) {
        (Some(ca), Some(cb), Some(cg)) => Some((*ca, *cb, *cg)),
        _ => None,
    };

    let Some((ca, cb, cg)) = anchors else {
        let mut mutated = Vec::with_capacity(records.len());
        for r in records {
            if !selection.matches(r) {
                mutated.push(r.clone());
                continue;
            }
            let name = r.name_upper();
            if RETIRED.contains(name.as_str()) {
                continue;
            }
            if name == "CG" {
                mutated.push(r.with_names("VAL", "CG1"));
            } else {
                mutated.push(r.with_res_name("VAL"));
            }
        }
        return Ok(mutated);
    };

    let axis = unit(&(ca.position - cb.position))?;
    let branch = rotate_about_axis(&(cg.position - cb.position), &axis, 2.0 * PI / 3.0);
    let cg2 = synthesized(
        cg,
        next_atom_id(records),
        "VAL",
        "CG2",
        "C",
        cb.position + branch,
    );

    let mut mutated = Vec::with_capacity(records.len());
    let mut inserted = false;
    for r in records {
        if !selection.matches(r) {
            mutated.push(r.clone());
            continue;
        }
        let name = r.name_upper();
        if RETIRED.contains(name.as_str()) {
            continue;
        }
        if name == "CG" {
            mutated.push(r.with_names("VAL", "CG1"));
            continue;
        }
        mutated.push(r.with_res_name("VAL"));
        if !inserted && name == "CB" {
            mutated.push(cg2.clone());
            inserted = true;
        }
    }
    if !inserted {
        mutated.push(cg2);
    }

    Ok(mutated)
}

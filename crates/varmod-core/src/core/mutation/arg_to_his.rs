use super::{MutationError, atoms_by_name, next_atom_id, residue_atoms, synthesized};
use crate::core::geometry::{
    fallback_reference, perpendicular_component, second_fallback_reference, unit,
};
use crate::core::models::atom::AtomRecord;
use crate::core::models::selection::ResidueSelection;
use nalgebra::{Point3, Vector3};
use phf::{Set, phf_set};
use std::f64::consts::PI;

/// Atoms shared by the ARG source and the HIS target up to the gamma carbon;
/// everything distal (the guanidinium group) is dropped.
static RETAINED: Set<&'static str> = phf_set! { "N", "CA", "C", "O", "CB", "CG" };

/// Imidazole ring edge length in Angstroms, approximated as regular.
const RING_EDGE: f64 = 1.37;

/// Ring positions walking the pentagon from CG at 180 degrees.
const RING_ANGLES: [(&str, &str, f64); 4] = [
    ("ND1", "N", 252.0),
    ("CD2", "C", 108.0),
    ("CE1", "C", 324.0),
    ("NE2", "N", 36.0),
];

/// Substitutes arginine with histidine at the selected residue.
///
/// Drops the distal guanidinium side chain and, when CB and CG are present,
/// places the four missing imidazole ring atoms on a regular pentagon: the
/// local frame takes its z-axis along CG->CB and its x-axis from the CG->CD
/// direction (CG->CA as fallback) projected perpendicular to z, and the
/// pentagon of edge 1.37 A is centered one circumradius along x from CG.
/// Without CB or CG the builder keeps only the shared atoms, renamed.
pub fn apply(
    records: &[AtomRecord],
    selection: &ResidueSelection,
) -> Result<Vec<AtomRecord>, MutationError> {
    let target = residue_atoms(records, selection)?;
    let by_name = atoms_by_name(&target);

    let (Some(cb), Some(cg)) = (by_name.get("CB").copied(), by_name.get("CG").copied()) else {
        return Ok(records
            .iter()
            .filter_map(|r| {
                if !selection.matches(r) {
                    Some(r.clone())
                } else if RETAINED.contains(r.name_upper().as_str()) {
                    Some(r.with_res_name("HIS"))
                } else {
                    None
                }
            })
            .collect());
    };

    let axis_z = unit(&(cb.position - cg.position))?;

    let reference = by_name
        .get("CD")
        .or_else(|| by_name.get("CA"))
        .map(|a| a.position - cg.position)
        .unwrap_or_else(|| fallback_reference(&axis_z));

    let mut in_plane = perpendicular_component(&reference, &axis_z);
    if in_plane.norm() < 1e-6 {
        in_plane = perpendicular_component(&second_fallback_reference(&axis_z), &axis_z);
    }
    let axis_x = unit(&in_plane)?;
    let axis_y: Vector3<f64> = axis_z.cross(&axis_x);

    // Circumradius of a regular pentagon: edge / (2 sin(pi/5)).
    let radius = RING_EDGE / (2.0 * (PI / 5.0).sin());
    let center = cg.position + axis_x.as_ref() * radius;
    let ring_pos = |angle_deg: f64| -> Point3<f64> {
        let a = angle_deg.to_radians();
        center + axis_x.as_ref() * (radius * a.cos()) + axis_y * (radius * a.sin())
    };

    let first_id = next_atom_id(records);
    let ring: Vec<AtomRecord> = RING_ANGLES
        .iter()
        .enumerate()
        .map(|(i, (name, element, angle))| {
            synthesized(cg, first_id + i, "HIS", name, element, ring_pos(*angle))
        })
        .collect();

    let mut mutated = Vec::with_capacity(records.len());
    let mut inserted = false;
    for r in records {
        if !selection.matches(r) {
            mutated.push(r.clone());
            continue;
        }
        let name = r.name_upper();
        if !RETAINED.contains(name.as_str()) {
            continue;
        }
        mutated.push(r.with_res_name("HIS"));
        if !inserted && name == "CG" {
            mutated.extend(ring.iter().cloned());
            inserted = true;
        }
    }
    if !inserted {
        mutated.extend(ring);
    }

    Ok(mutated)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{names, residue};
    use super::*;

    const ARG_ATOMS: [&str; 11] = [
        "N", "CA", "C", "O", "CB", "CG", "CD", "NE", "CZ", "NH1", "NH2",
    ];

    fn selection() -> ResidueSelection {
        ResidueSelection::new("r", 340, None)
    }

    #[test]
    fn removes_guanidinium_and_adds_ring() {
        let records = residue("r", 340, "ARG", &ARG_ATOMS);
        let mutated = apply(&records, &selection()).unwrap();
        // CD, NE, CZ, NH1, NH2 out; ND1, CD2, CE1, NE2 in.
        assert_eq!(mutated.len(), records.len() - 5 + 4);
        let atom_names = names(&mutated);
        for gone in ["CD", "NE", "CZ", "NH1", "NH2"] {
            assert!(!atom_names.contains(&gone.to_string()), "{gone} retained");
        }
        for added in ["ND1", "CD2", "CE1", "NE2"] {
            assert!(atom_names.contains(&added.to_string()), "{added} missing");
        }
        assert!(mutated.iter().all(|r| r.res_name == "HIS"));
    }

    #[test]
    fn ring_atoms_are_spliced_after_cg_in_order() {
        let records = residue("r", 340, "ARG", &ARG_ATOMS);
        let mutated = apply(&records, &selection()).unwrap();
        let atom_names = names(&mutated);
        let cg = atom_names.iter().position(|n| n == "CG").unwrap();
        assert_eq!(&atom_names[cg + 1..cg + 5], ["ND1", "CD2", "CE1", "NE2"]);
    }

    #[test]
    fn ring_lies_on_a_regular_pentagon_around_cg() {
        let records = residue("r", 340, "ARG", &ARG_ATOMS);
        let mutated = apply(&records, &selection()).unwrap();
        let find = |name: &str| {
            mutated
                .iter()
                .find(|r| r.name_upper() == name)
                .unwrap()
                .position
        };
        let cg = find("CG");
        let nd1 = find("ND1");
        let cd2 = find("CD2");
        let ce1 = find("CE1");
        let ne2 = find("NE2");

        // Pentagon edges: CG-ND1, ND1-CE1, CE1-NE2, NE2-CD2, CD2-CG.
        for (a, b) in [(cg, nd1), (nd1, ce1), (ce1, ne2), (ne2, cd2), (cd2, cg)] {
            assert!(((a - b).norm() - RING_EDGE).abs() < 1e-9);
        }
    }

    #[test]
    fn ring_is_coplanar_with_the_cg_cb_frame() {
        let records = residue("r", 340, "ARG", &ARG_ATOMS);
        let mutated = apply(&records, &selection()).unwrap();
        let find = |name: &str| {
            mutated
                .iter()
                .find(|r| r.name_upper() == name)
                .unwrap()
                .position
        };
        let cg = find("CG");
        let cb = find("CB");
        let normal = (cb - cg).normalize();
        // Ring plane is perpendicular to CG->CB by construction.
        for name in ["ND1", "CD2", "CE1", "NE2"] {
            let d = normal.dot(&(find(name) - cg));
            assert!(d.abs() < 1e-9, "{name} off plane by {d}");
        }
    }

    #[test]
    fn ring_ids_are_assigned_in_insertion_order() {
        let records = residue("r", 340, "ARG", &ARG_ATOMS);
        let mutated = apply(&records, &selection()).unwrap();
        let id_of = |name: &str| {
            mutated
                .iter()
                .find(|r| r.name_upper() == name)
                .unwrap()
                .atom_id
        };
        assert_eq!(id_of("ND1"), 12);
        assert_eq!(id_of("CD2"), 13);
        assert_eq!(id_of("CE1"), 14);
        assert_eq!(id_of("NE2"), 15);
    }

    #[test]
    fn missing_cg_degrades_to_rename_and_trim() {
        let records = residue("r", 340, "ARG", &["N", "CA", "C", "O", "CB", "NH1"]);
        let mutated = apply(&records, &selection()).unwrap();
        // NH1 dropped, no ring synthesized.
        assert_eq!(names(&mutated), vec!["N", "CA", "C", "O", "CB"]);
        assert!(mutated.iter().all(|r| r.res_name == "HIS"));
    }

    #[test]
    fn missing_residue_is_not_found() {
        let records = residue("r", 340, "ARG", &ARG_ATOMS);
        let err = apply(&records, &ResidueSelection::new("r", 341, None)).unwrap_err();
        assert!(matches!(err, MutationError::ResidueNotFound { .. }));
    }
}

use nalgebra::Point3;
use std::str::FromStr;

/// Distinguishes standard polymer atoms from heteroatoms.
///
/// This mirrors the `ATOM`/`HETATM` record split of crystallographic
/// coordinate formats and is part of the identity key used when collapsing
/// alternate locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RecordKind {
    /// A standard polymer atom (`ATOM`).
    #[default]
    Standard,
    /// A heteroatom (`HETATM`): ligands, cofactors, ions, solvent.
    Hetero,
}

impl RecordKind {
    /// The record-type label used in fixed-column coordinate output.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Standard => "ATOM",
            RecordKind::Hetero => "HETATM",
        }
    }
}

impl FromStr for RecordKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ATOM" => Ok(RecordKind::Standard),
            "HETATM" => Ok(RecordKind::Hetero),
            _ => Err(()),
        }
    }
}

/// One resolved atom observation.
///
/// An `AtomRecord` is an immutable value: transforms that rename, reposition,
/// or re-chain an atom produce new records via the `with_*` helpers rather
/// than mutating in place, which keeps every downstream builder a pure
/// function over its input.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Standard polymer atom or heteroatom.
    pub kind: RecordKind,
    /// Source-file atom id (`_atom_site.id`). Used for deterministic output
    /// ordering and max-id bookkeeping, never as identity.
    pub atom_id: usize,
    /// Element symbol, normalized upper-case (1-2 letters).
    pub element: String,
    /// Residue name (<= 4 chars, upper-case).
    pub res_name: String,
    /// Author-assigned chain label (may be longer than one character).
    pub chain_auth: String,
    /// Single-character output chain id assigned by the remapper.
    /// Holds the `'?'` placeholder until assignment.
    pub chain_out: char,
    /// Segment tag (<= 4 chars), derived from the author chain label.
    pub segment: String,
    /// Residue sequence number.
    pub res_seq: isize,
    /// Insertion code, if any.
    pub ins_code: Option<char>,
    /// Atom name (<= 4 chars, e.g. "CA", "OG1").
    pub atom_name: String,
    /// Position in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy in [0, 1]; 1.0 when the source omits it.
    pub occupancy: f64,
    /// Isotropic temperature factor; 0.0 when the source omits it.
    pub b_factor: f64,
}

/// The identity key under which alternate locations of the same physical
/// atom collapse to a single record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomKey {
    pub kind: RecordKind,
    pub chain_auth: String,
    pub res_seq: isize,
    pub ins_code: Option<char>,
    pub res_name: String,
    pub atom_name: String,
}

impl AtomRecord {
    /// The deduplication key of this record.
    pub fn key(&self) -> AtomKey {
        AtomKey {
            kind: self.kind,
            chain_auth: self.chain_auth.clone(),
            res_seq: self.res_seq,
            ins_code: self.ins_code,
            res_name: self.res_name.clone(),
            atom_name: self.atom_name.clone(),
        }
    }

    /// The atom name trimmed and upper-cased, the form used for lookups.
    pub fn name_upper(&self) -> String {
        self.atom_name.trim().to_ascii_uppercase()
    }

    /// A copy of this record carrying a new residue name.
    pub fn with_res_name(&self, res_name: &str) -> Self {
        Self {
            res_name: res_name.to_string(),
            ..self.clone()
        }
    }

    /// A copy of this record carrying a new residue name and atom name.
    pub fn with_names(&self, res_name: &str, atom_name: &str) -> Self {
        Self {
            res_name: res_name.to_string(),
            atom_name: atom_name.to_string(),
            ..self.clone()
        }
    }

    /// A copy of this record carrying an assigned output chain id.
    pub fn with_chain_out(&self, chain_out: char) -> Self {
        Self {
            chain_out,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AtomRecord {
        AtomRecord {
            kind: RecordKind::Standard,
            atom_id: 17,
            element: "C".to_string(),
            res_name: "MET".to_string(),
            chain_auth: "mA".to_string(),
            chain_out: '?',
            segment: "mA".to_string(),
            res_seq: 64,
            ins_code: None,
            atom_name: "CG".to_string(),
            position: Point3::new(1.0, 2.0, 3.0),
            occupancy: 1.0,
            b_factor: 30.5,
        }
    }

    #[test]
    fn record_kind_parses_and_labels() {
        assert_eq!(RecordKind::from_str("ATOM"), Ok(RecordKind::Standard));
        assert_eq!(RecordKind::from_str("hetatm"), Ok(RecordKind::Hetero));
        assert_eq!(RecordKind::from_str("LOOP"), Err(()));
        assert_eq!(RecordKind::Standard.label(), "ATOM");
        assert_eq!(RecordKind::Hetero.label(), "HETATM");
    }

    #[test]
    fn key_ignores_position_and_id() {
        let a = sample();
        let mut b = sample();
        b.atom_id = 99;
        b.position = Point3::new(9.0, 9.0, 9.0);
        b.occupancy = 0.4;
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn key_distinguishes_altloc_irrelevant_fields() {
        let a = sample();
        let renamed = a.with_names("VAL", "CG1");
        assert_ne!(a.key(), renamed.key());
    }

    #[test]
    fn with_helpers_leave_original_untouched() {
        let a = sample();
        let b = a.with_res_name("VAL");
        assert_eq!(a.res_name, "MET");
        assert_eq!(b.res_name, "VAL");
        assert_eq!(b.atom_name, a.atom_name);

        let c = a.with_chain_out('m');
        assert_eq!(a.chain_out, '?');
        assert_eq!(c.chain_out, 'm');
    }

    #[test]
    fn name_upper_trims_and_uppercases() {
        let mut a = sample();
        a.atom_name = " cg2 ".to_string();
        assert_eq!(a.name_upper(), "CG2");
    }
}

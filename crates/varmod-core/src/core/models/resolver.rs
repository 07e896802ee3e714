use super::atom::{AtomKey, AtomRecord, RecordKind};
use crate::core::io::cif::{AtomSiteReader, CifError};
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::BufRead;
use std::str::FromStr;

/// Occupancies closer than this are treated as tied and fall through to the
/// alternate-location rank.
pub const OCCUPANCY_EPSILON: f64 = 1e-6;

const REQUIRED_COLUMNS: [&str; 15] = [
    "_atom_site.group_PDB",
    "_atom_site.id",
    "_atom_site.type_symbol",
    "_atom_site.label_alt_id",
    "_atom_site.auth_seq_id",
    "_atom_site.auth_comp_id",
    "_atom_site.auth_asym_id",
    "_atom_site.auth_atom_id",
    "_atom_site.pdbx_PDB_ins_code",
    "_atom_site.Cartn_x",
    "_atom_site.Cartn_y",
    "_atom_site.Cartn_z",
    "_atom_site.occupancy",
    "_atom_site.B_iso_or_equiv",
    "_atom_site.pdbx_PDB_model_num",
];

/// Controls which raw rows survive resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Experimental model number to keep (multi-model sources carry several).
    pub model_num: i64,
    /// Drop hydrogen-element atoms.
    pub heavy_only: bool,
    /// Residue name treated as solvent and dropped, if any.
    pub solvent: Option<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            model_num: 1,
            heavy_only: true,
            solvent: Some("HOH".to_string()),
        }
    }
}

/// The outcome of altloc/model resolution: one record per [`AtomKey`], in
/// original atom-id order, plus the first-appearance order of author chains
/// feeding the chain-id remapper.
#[derive(Debug, Clone)]
pub struct ResolvedAtoms {
    pub records: Vec<AtomRecord>,
    pub chain_order: Vec<String>,
}

/// Rank of an alternate-location code: 'A' > blank/'.' > '?' > any other.
fn altloc_rank(altloc: &str) -> u8 {
    match altloc {
        "A" => 3,
        "" | "." => 2,
        "?" => 1,
        _ => 0,
    }
}

fn parse_int(column: &str, value: &str) -> Result<i64, CifError> {
    if value == "." || value == "?" {
        return Err(CifError::InvalidInt {
            column: column.to_string(),
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| CifError::InvalidInt {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Placeholder tokens in optional float fields fall back to a documented
/// default instead of failing.
fn parse_float_or(value: &str, default: f64) -> f64 {
    if value == "." || value == "?" {
        return default;
    }
    value.parse().unwrap_or(default)
}

fn parse_ins_code(value: &str) -> Option<char> {
    match value {
        "" | "." | "?" => None,
        other => other.chars().next(),
    }
}

/// Folds raw `_atom_site` rows into a deduplicated atom set.
///
/// For each surviving row the dedup map is keyed by [`AtomKey`]; on a
/// collision the incoming row wins when its occupancy exceeds the stored one
/// by more than [`OCCUPANCY_EPSILON`], or, when occupancies tie within the
/// epsilon, when its alternate-location code outranks the stored one.
///
/// # Errors
///
/// Returns [`CifError::MissingColumns`] when a required column is absent and
/// [`CifError::InvalidInt`] when a required integer field is malformed.
pub fn resolve_atom_sites<R: BufRead>(
    reader: AtomSiteReader<R>,
    options: &ResolveOptions,
) -> Result<ResolvedAtoms, CifError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| reader.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CifError::MissingColumns(missing));
    }

    let col = |name: &str| reader.column_index(name).unwrap_or(0);
    let c_group = col("_atom_site.group_PDB");
    let c_id = col("_atom_site.id");
    let c_element = col("_atom_site.type_symbol");
    let c_altloc = col("_atom_site.label_alt_id");
    let c_res_seq = col("_atom_site.auth_seq_id");
    let c_res_name = col("_atom_site.auth_comp_id");
    let c_chain = col("_atom_site.auth_asym_id");
    let c_atom_name = col("_atom_site.auth_atom_id");
    let c_ins_code = col("_atom_site.pdbx_PDB_ins_code");
    let c_x = col("_atom_site.Cartn_x");
    let c_y = col("_atom_site.Cartn_y");
    let c_z = col("_atom_site.Cartn_z");
    let c_occupancy = col("_atom_site.occupancy");
    let c_b_factor = col("_atom_site.B_iso_or_equiv");
    let c_model = col("_atom_site.pdbx_PDB_model_num");

    let mut chosen: HashMap<AtomKey, (AtomRecord, u8)> = HashMap::new();
    let mut chain_order: Vec<String> = Vec::new();

    for row in reader {
        let fields = row?;

        let model = parse_int("_atom_site.pdbx_PDB_model_num", &fields[c_model])?;
        if model != options.model_num {
            continue;
        }

        let element = fields[c_element].to_ascii_uppercase();
        if options.heavy_only && element == "H" {
            continue;
        }

        let res_name = fields[c_res_name].to_ascii_uppercase();
        if options
            .solvent
            .as_deref()
            .is_some_and(|solvent| res_name == solvent)
        {
            continue;
        }

        let kind = RecordKind::from_str(&fields[c_group]).unwrap_or_default();
        let atom_id = parse_int("_atom_site.id", &fields[c_id])? as usize;
        let res_seq = parse_int("_atom_site.auth_seq_id", &fields[c_res_seq])? as isize;
        let altloc = match fields[c_altloc].as_str() {
            "." | "?" => "",
            other => other,
        };
        let chain_auth = fields[c_chain].clone();
        let segment: String = chain_auth.chars().take(4).collect();

        let record = AtomRecord {
            kind,
            atom_id,
            element,
            res_name,
            chain_auth: chain_auth.clone(),
            chain_out: '?',
            segment,
            res_seq,
            ins_code: parse_ins_code(&fields[c_ins_code]),
            atom_name: fields[c_atom_name].clone(),
            position: Point3::new(
                parse_float_or(&fields[c_x], 0.0),
                parse_float_or(&fields[c_y], 0.0),
                parse_float_or(&fields[c_z], 0.0),
            ),
            occupancy: parse_float_or(&fields[c_occupancy], 1.0),
            b_factor: parse_float_or(&fields[c_b_factor], 0.0),
        };

        if !chain_order.contains(&chain_auth) {
            chain_order.push(chain_auth);
        }

        let rank = altloc_rank(altloc);
        match chosen.entry(record.key()) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert((record, rank));
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                let (stored, stored_rank) = slot.get();
                if record.occupancy > stored.occupancy + OCCUPANCY_EPSILON {
                    slot.insert((record, rank));
                } else if (record.occupancy - stored.occupancy).abs() <= OCCUPANCY_EPSILON
                    && rank > *stored_rank
                {
                    slot.insert((record, rank));
                }
            }
        }
    }

    let mut records: Vec<AtomRecord> = chosen.into_values().map(|(record, _)| record).collect();
    records.sort_by_key(|r| r.atom_id);

    Ok(ResolvedAtoms {
        records,
        chain_order,
    })
}

use crate::core::models::atom::AtomRecord;
use crate::core::models::selection::ResidueSelection;
use crate::core::mutation::{MutationError, ala_to_thr, arg_to_his, met_to_val};
use std::str::FromStr;
use tracing::info;

/// The residue substitutions the library can build coordinates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Substitution {
    MetToVal,
    AlaToThr,
    ArgToHis,
}

impl Substitution {
    /// Residue type the selection must currently hold.
    pub fn source(&self) -> &'static str {
        match self {
            Substitution::MetToVal => "MET",
            Substitution::AlaToThr => "ALA",
            Substitution::ArgToHis => "ARG",
        }
    }

    /// Residue type the selection holds afterwards.
    pub fn target(&self) -> &'static str {
        match self {
            Substitution::MetToVal => "VAL",
            Substitution::AlaToThr => "THR",
            Substitution::ArgToHis => "HIS",
        }
    }

    /// Runs the matching builder over the record set.
    pub fn apply(
        &self,
        records: &[AtomRecord],
        selection: &ResidueSelection,
    ) -> Result<Vec<AtomRecord>, MutationError> {
        info!(
            substitution = %format!("{}>{}", self.source(), self.target()),
            residue = %selection,
            "applying point mutation"
        );
        match self {
            Substitution::MetToVal => met_to_val::apply(records, selection),
            Substitution::AlaToThr => ala_to_thr::apply(records, selection),
            Substitution::ArgToHis => arg_to_his::apply(records, selection),
        }
    }
}

impl FromStr for Substitution {
    type Err = MutationError;

    /// Parses a `FROM>TO` pair of residue names, e.g. `MET>VAL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MET>VAL" => Ok(Substitution::MetToVal),
            "ALA>THR" => Ok(Substitution::AlaToThr),
            "ARG>HIS" => Ok(Substitution::ArgToHis),
            other => Err(MutationError::UnsupportedSubstitution(other.to_string())),
        }
    }
}

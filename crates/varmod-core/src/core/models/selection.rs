use super::atom::AtomRecord;
use std::fmt;

/// Identifies exactly one residue instance: (author chain, sequence number,
/// insertion code).
///
/// Selections are transient scoping values handed to the mutation builders;
/// they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueSelection {
    pub chain_auth: String,
    pub res_seq: isize,
    pub ins_code: Option<char>,
}

impl ResidueSelection {
    pub fn new(chain_auth: &str, res_seq: isize, ins_code: Option<char>) -> Self {
        Self {
            chain_auth: chain_auth.to_string(),
            res_seq,
            ins_code,
        }
    }

    /// Whether a record belongs to the selected residue.
    pub fn matches(&self, record: &AtomRecord) -> bool {
        record.chain_auth == self.chain_auth
            && record.res_seq == self.res_seq
            && record.ins_code == self.ins_code
    }
}

impl fmt::Display for ResidueSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_auth, self.res_seq)?;
        if let Some(code) = self.ins_code {
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}

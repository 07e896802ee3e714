use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// The fixed alphabet of single-character chain ids accepted by the legacy
/// fixed-column coordinate format, in assignment scan order.
pub const CHAIN_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Error)]
pub enum ChainMapError {
    #[error(
        "chain-id alphabet exhausted after {assigned} chains; the single-model coordinate format cannot hold more"
    )]
    AlphabetExhausted { assigned: usize },
}

/// An injective mapping from author chain labels to single-character output
/// chain ids.
///
/// Built once per structure from the first-appearance order of author chains,
/// then immutable. Author ids that are already a valid, unclaimed alphabet
/// character keep themselves; everything else receives the first unclaimed
/// character in [`CHAIN_ALPHABET`] scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainMap {
    entries: Vec<(String, char)>,
    lookup: HashMap<String, char>,
}

impl ChainMap {
    /// Builds the mapping from author chain ids in first-appearance order.
    ///
    /// # Errors
    ///
    /// Returns [`ChainMapError::AlphabetExhausted`] when the structure has
    /// more distinct chains than the 62-character alphabet can absorb.
    pub fn assign<S: AsRef<str>>(chain_order: &[S]) -> Result<Self, ChainMapError> {
        let mut map = ChainMap::default();
        let mut used: HashSet<char> = HashSet::new();

        for auth in chain_order {
            let auth = auth.as_ref();
            if map.lookup.contains_key(auth) {
                continue;
            }

            let mut chars = auth.chars();
            let keep = match (chars.next(), chars.next()) {
                (Some(c), None) if CHAIN_ALPHABET.contains(c) && !used.contains(&c) => Some(c),
                _ => None,
            };

            let out = match keep {
                Some(c) => c,
                None => CHAIN_ALPHABET
                    .chars()
                    .find(|c| !used.contains(c))
                    .ok_or(ChainMapError::AlphabetExhausted {
                        assigned: map.entries.len(),
                    })?,
            };

            used.insert(out);
            map.entries.push((auth.to_string(), out));
            map.lookup.insert(auth.to_string(), out);
        }

        Ok(map)
    }

    /// The output id assigned to an author chain label.
    pub fn get(&self, chain_auth: &str) -> Option<char> {
        self.lookup.get(chain_auth).copied()
    }

    /// Entries in assignment (first-appearance) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char)> {
        self.entries.iter().map(|(auth, out)| (auth.as_str(), *out))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ChainMap {
    /// Serializes as a key->value object with keys sorted for stable output.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut sorted: Vec<&(String, char)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (auth, out) in sorted {
            map.serialize_entry(auth, out)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_single_char_ids_map_to_themselves() {
        let map = ChainMap::assign(&["m", "s", "B", "9"]).unwrap();
        assert_eq!(map.get("m"), Some('m'));
        assert_eq!(map.get("s"), Some('s'));
        assert_eq!(map.get("B"), Some('B'));
        assert_eq!(map.get("9"), Some('9'));
    }

    #[test]
    fn long_ids_get_first_unclaimed_character() {
        let map = ChainMap::assign(&["AB", "CD"]).unwrap();
        assert_eq!(map.get("AB"), Some('A'));
        assert_eq!(map.get("CD"), Some('B'));
    }

    #[test]
    fn claimed_character_forces_reassignment() {
        // "A" claims 'A' first, so the author chain "A2" cannot keep 'A'.
        let map = ChainMap::assign(&["A", "A2"]).unwrap();
        assert_eq!(map.get("A"), Some('A'));
        assert_eq!(map.get("A2"), Some('B'));
    }

    #[test]
    fn mapping_is_injective() {
        let order: Vec<String> = (0..40).map(|i| format!("ch{i}")).collect();
        let map = ChainMap::assign(&order).unwrap();
        let mut outs: Vec<char> = map.iter().map(|(_, c)| c).collect();
        outs.sort_unstable();
        outs.dedup();
        assert_eq!(outs.len(), 40);
    }

    #[test]
    fn duplicate_author_ids_collapse_to_one_entry() {
        let map = ChainMap::assign(&["m", "m", "s"]).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn alphabet_exhaustion_is_a_capacity_error() {
        let order: Vec<String> = (0..63).map(|i| format!("chain{i}")).collect();
        let err = ChainMap::assign(&order).unwrap_err();
        assert!(matches!(
            err,
            ChainMapError::AlphabetExhausted { assigned: 62 }
        ));
    }

    #[test]
    fn serializes_as_sorted_object() {
        let map = ChainMap::assign(&["s", "m", "BC"]).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"BC":"A","m":"m","s":"s"}"#);
    }
}

//! Streaming input/output for the two coordinate formats the pipeline
//! touches: the loop-structured mmCIF `_atom_site` family on the way in, and
//! the legacy fixed 80-column coordinate format on the way out (plus a
//! column-slicing reader for it, used by downstream geometry tools).

pub mod cif;
pub mod pdb;

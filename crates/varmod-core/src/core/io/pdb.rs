use crate::core::models::atom::{AtomRecord, RecordKind};
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

const LINE_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Places an atom name inside its 4-column field.
///
/// Names of four or more characters fill the field; otherwise a name is
/// right-justified when it starts with a digit or when its first letter
/// matches a single-letter element symbol, and left-justified in every other
/// case. This keeps visualization tools happy about the element/name split.
fn format_atom_name(atom_name: &str, element: &str) -> String {
    let name = atom_name.trim();
    if name.len() >= 4 {
        return name.chars().take(4).collect();
    }
    if name.is_empty() {
        return "    ".to_string();
    }
    let element = element.trim().to_ascii_uppercase();
    let first = name.chars().next().unwrap_or(' ');
    if first.is_ascii_digit() {
        return format!("{name:>4}");
    }
    if element.len() == 1 && first.to_ascii_uppercase().to_string() == element {
        return format!("{name:>4}");
    }
    format!("{name:<4}")
}

/// Serializes one atom into a fixed 80-column coordinate line.
///
/// The serial is the caller's densely re-assigned one, not the record's
/// original atom id. Columns 73-76 carry the segment tag and 77-78 the
/// element symbol, the extension layout expected by common visualization
/// and topology tooling. The altloc column is always blank: records reaching
/// the writer have already been resolved to a single conformation.
pub fn format_atom_line(serial: usize, r: &AtomRecord) -> String {
    let atom_name = format_atom_name(&r.atom_name, &r.element);
    let res_name: String = if r.res_name.is_empty() {
        "UNK".to_string()
    } else {
        r.res_name.chars().take(3).collect()
    };
    let ins_code = r.ins_code.unwrap_or(' ');
    let segment: String = r.segment.chars().take(4).collect();
    let element: String = r
        .element
        .trim()
        .to_ascii_uppercase()
        .chars()
        .take(2)
        .collect();

    format!(
        "{:<6}{:>5} {}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}{:6}{:<4}{:>2}{:2}",
        r.kind.label(),
        serial,
        atom_name,
        ' ', // altloc
        res_name,
        r.chain_out,
        r.res_seq,
        ins_code,
        r.position.x,
        r.position.y,
        r.position.z,
        r.occupancy,
        r.b_factor,
        "",
        segment,
        element,
        "",
    )
}

/// Word-wraps free annotation text into `REMARK` lines padded to exactly 80
/// columns.
///
/// A single token longer than the usable width is hard-chunked; otherwise
/// tokens are never split, so URLs survive intact.
pub fn wrap_remark(text: &str, remark_num: u32) -> Vec<String> {
    let prefix = format!("REMARK {remark_num:>3} ");
    let width = LINE_WIDTH - prefix.len();

    let pad = |body: &str| -> String {
        let mut line = format!("{prefix}{body}");
        line.truncate(LINE_WIDTH);
        format!("{line:<LINE_WIDTH$}")
    };

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![format!("{:<LINE_WIDTH$}", prefix.trim_end())];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in words {
        if current.is_empty() {
            if word.len() <= width {
                current = word.to_string();
            } else {
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(width) {
                    lines.push(pad(&chunk.iter().collect::<String>()));
                }
            }
            continue;
        }
        if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(pad(&current));
            if word.len() <= width {
                current = word.to_string();
            } else {
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(width) {
                    lines.push(pad(&chunk.iter().collect::<String>()));
                }
                current = String::new();
            }
        }
    }
    if !current.is_empty() {
        lines.push(pad(&current));
    }
    lines
}

/// Writes a coordinate model: optional remark block, atom lines with serials
/// re-assigned densely from 1, and the `END` terminator.
pub fn write_model(
    writer: &mut impl Write,
    records: &[AtomRecord],
    remarks: &[String],
) -> Result<(), PdbError> {
    for remark in remarks {
        for line in wrap_remark(remark, 1) {
            writeln!(writer, "{line}")?;
        }
    }
    for (index, record) in records.iter().enumerate() {
        writeln!(writer, "{}", format_atom_line(index + 1, record))?;
    }
    writeln!(writer, "END")?;
    Ok(())
}

/// Writes a coordinate model to a path, creating parent directories as
/// needed.
pub fn write_model_to_path<P: AsRef<Path>>(
    path: P,
    records: &[AtomRecord],
    remarks: &[String],
) -> Result<(), PdbError> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_model(&mut writer, records, remarks)
}

/// A minimal atom observation recovered from a fixed-column coordinate line.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbAtom {
    pub kind: RecordKind,
    pub atom_name: String,
    pub res_name: String,
    pub chain: char,
    pub res_seq: isize,
    pub position: Point3<f64>,
}

fn slice(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("")
}

/// Reads ATOM/HETATM lines back by column slicing.
///
/// Lines that are too short or carry unparsable coordinates are skipped, the
/// same tolerance downstream geometry tools apply.
pub fn read_atoms(reader: impl BufRead) -> Result<Vec<PdbAtom>, PdbError> {
    let mut atoms = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let Ok(kind) = RecordKind::from_str(slice(&line, 0, 6).trim()) else {
            continue;
        };
        if line.len() < 54 {
            continue;
        }
        let (Ok(x), Ok(y), Ok(z)) = (
            slice(&line, 30, 38).trim().parse::<f64>(),
            slice(&line, 38, 46).trim().parse::<f64>(),
            slice(&line, 46, 54).trim().parse::<f64>(),
        ) else {
            continue;
        };
        let Ok(res_seq) = slice(&line, 22, 26).trim().parse::<isize>() else {
            continue;
        };
        atoms.push(PdbAtom {
            kind,
            atom_name: slice(&line, 12, 16).trim().to_ascii_uppercase(),
            res_name: slice(&line, 17, 20).trim().to_ascii_uppercase(),
            chain: slice(&line, 21, 22).chars().next().unwrap_or(' '),
            res_seq,
            position: Point3::new(x, y, z),
        });
    }
    Ok(atoms)
}

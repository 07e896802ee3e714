use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("no _atom_site loop found in input")]
    MissingAtomSiteLoop,
    #[error("missing expected _atom_site columns: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("invalid integer in column '{column}' (value: '{value}')")]
    InvalidInt { column: String, value: String },
}

/// Tokenizes one data row of a loop block.
///
/// Fields are whitespace-separated; a field that *begins* with a single or
/// double quote runs verbatim (embedded whitespace included) to the next
/// matching quote. Quotes inside an unquoted token are ordinary characters.
pub fn tokenize_row(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let n = chars.len();

    while i < n {
        while i < n && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= n {
            break;
        }
        if chars[i] == '\'' || chars[i] == '"' {
            let quote = chars[i];
            i += 1;
            let start = i;
            while i < n && chars[i] != quote {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
            i += 1; // skip closing quote
            continue;
        }
        let start = i;
        while i < n && !chars[i].is_whitespace() {
            i += 1;
        }
        tokens.push(chars[start..i].iter().collect());
    }

    tokens
}

/// A lazy, single-pass reader over the first `_atom_site` loop of an mmCIF
/// source.
///
/// Construction scans forward to the loop header and collects the declared
/// column names; iteration then yields one tokenized row at a time until the
/// block ends at a `#` marker or the next block keyword. Rows carrying fewer
/// tokens than there are declared columns are silently discarded.
#[derive(Debug)]
pub struct AtomSiteReader<R: BufRead> {
    lines: io::Lines<R>,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    pending: Option<String>,
    done: bool,
}

impl<R: BufRead> AtomSiteReader<R> {
    /// Scans to the first `_atom_site` loop and captures its header.
    ///
    /// # Errors
    ///
    /// Returns [`CifError::MissingAtomSiteLoop`] when the source ends before
    /// any `_atom_site` header block, and propagates I/O errors.
    pub fn new(reader: R) -> Result<Self, CifError> {
        let mut lines = reader.lines();
        let mut in_loop = false;
        let mut columns: Vec<String> = Vec::new();
        let mut pending = None;

        for line in lines.by_ref() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed == "loop_" {
                in_loop = true;
                columns.clear();
                continue;
            }
            if !in_loop {
                continue;
            }
            if trimmed.starts_with("_atom_site.") {
                columns.push(trimmed.to_string());
                continue;
            }
            if !columns.is_empty() {
                // First non-header line of the atom_site loop: data begins.
                if !trimmed.starts_with('#') {
                    pending = Some(trimmed.to_string());
                }
                break;
            }
        }

        if columns.is_empty() {
            return Err(CifError::MissingAtomSiteLoop);
        }

        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self {
            lines,
            columns,
            index,
            pending,
            done: false,
        })
    }

    /// The declared column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The position of a column by its full name (e.g. `_atom_site.id`).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn next_data_line(&mut self) -> Option<io::Result<String>> {
        if let Some(line) = self.pending.take() {
            return Some(Ok(line));
        }
        for line in self.lines.by_ref() {
            let line = match line {
                Ok(l) => l,
                Err(e) => return Some(Err(e)),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#')
                || trimmed == "loop_"
                || trimmed.starts_with("data_")
                || trimmed.starts_with('_')
            {
                return None; // block boundary
            }
            return Some(Ok(trimmed.to_string()));
        }
        None
    }
}

impl<R: BufRead> Iterator for AtomSiteReader<R> {
    type Item = Result<Vec<String>, CifError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.next_data_line() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                Some(Ok(line)) => {
                    let tokens = tokenize_row(&line);
                    if tokens.len() < self.columns.len() {
                        continue; // malformed-line tolerance
                    }
                    return Some(Ok(tokens));
                }
            }
        }
    }
}

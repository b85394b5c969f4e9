use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::GdatError;
use crate::io::open_maybe_gz;

#[derive(Debug, Clone)]
pub struct GdatTable {
    names: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<f64>>,
    pub warnings: Vec<String>,
}

impl GdatTable {
    pub fn new(names: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        let (index, warnings) = build_name_index(&names);
        Self {
            names,
            index,
            rows,
            warnings,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Case-insensitive lookup of a variable's column (1-based, 0 is time).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(&name.trim().to_lowercase()).copied()
    }

    pub fn time(&self) -> Vec<f64> {
        self.column_values(0)
    }

    pub fn column_values(&self, col: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[col]).collect()
    }

    pub fn series(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name).map(|col| self.column_values(col))
    }
}

// Duplicate names (after lowercasing) keep the first column.
fn build_name_index(names: &[String]) -> (HashMap<String, usize>, Vec<String>) {
    let mut index = HashMap::new();
    let mut warnings = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let key = name.to_lowercase();
        if let Some(first) = index.get(&key) {
            warnings.push(format!(
                "duplicate variable '{}' at column {} (kept column {})",
                name,
                i + 1,
                first
            ));
        } else {
            index.insert(key, i + 1);
        }
    }
    (index, warnings)
}

pub fn read_gdat(path: &Path) -> Result<GdatTable, GdatError> {
    let reader = open_maybe_gz(path).map_err(|source| io_err(path, source))?;
    parse_gdat(BufReader::new(reader), path)
}

pub fn read_header(path: &Path) -> Result<Vec<String>, GdatError> {
    let reader = open_maybe_gz(path).map_err(|source| io_err(path, source))?;
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .map_err(|source| io_err(path, source))?;
        if n == 0 {
            return Err(GdatError::Empty {
                path: path.to_path_buf(),
            });
        }
        if !line.trim().is_empty() {
            return parse_header(&line, path);
        }
    }
}

pub fn parse_gdat<R: BufRead>(mut reader: R, path: &Path) -> Result<GdatTable, GdatError> {
    let mut names: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut line = String::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .map_err(|source| io_err(path, source))?;
        if n == 0 {
            break;
        }
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(header) = names.as_ref() else {
            names = Some(parse_header(trimmed, path)?);
            continue;
        };

        if trimmed.starts_with('#') {
            continue;
        }

        let expected = header.len() + 1;
        let mut row = Vec::with_capacity(expected);
        for token in trimmed.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| GdatError::ParseFloat {
                path: path.to_path_buf(),
                line: line_no,
                token: token.to_string(),
            })?;
            row.push(value);
        }
        if row.len() != expected {
            return Err(GdatError::RowWidth {
                path: path.to_path_buf(),
                line: line_no,
                expected,
                found: row.len(),
            });
        }
        rows.push(row);
    }

    let names = names.ok_or_else(|| GdatError::Empty {
        path: path.to_path_buf(),
    })?;
    match rows.len() {
        0 => Err(GdatError::Empty {
            path: path.to_path_buf(),
        }),
        1 => Err(GdatError::OneDimensional {
            path: path.to_path_buf(),
        }),
        _ => Ok(GdatTable::new(names, rows)),
    }
}

/// `# time A B` and `#time A B` both yield `[A, B]`.
fn parse_header(line: &str, path: &Path) -> Result<Vec<String>, GdatError> {
    let stripped = line.trim().trim_start_matches('#');
    let names: Vec<String> = stripped
        .split_whitespace()
        .skip(1)
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(GdatError::BadHeader {
            path: path.to_path_buf(),
        });
    }
    Ok(names)
}

fn io_err(path: &Path, source: std::io::Error) -> GdatError {
    GdatError::Io {
        path: PathBuf::from(path),
        source,
    }
}

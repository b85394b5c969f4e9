use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::io::delimited::{join_record, split_record};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) => Self::Number(v),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamRecord {
    entries: Vec<(String, ParamValue)>,
    index: HashMap<String, usize>,
}

impl ParamRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and keeps the existing value) when `name` is already
    /// present.
    pub fn insert(&mut self, name: &str, value: ParamValue) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), value));
        true
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ParamFile {
    pub record: ParamRecord,
    pub warnings: Vec<String>,
}

pub fn read_params(path: &Path) -> Result<ParamFile> {
    let file = File::open(path)
        .with_context(|| format!("failed to open parameter file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line.with_context(|| format!("failed to read {}", path.display()))?);
    }
    Ok(parse_params(&lines, &path.display().to_string()))
}

pub fn parse_params<S: AsRef<str>>(lines: &[S], source: &str) -> ParamFile {
    let mut record = ParamRecord::new();
    let mut warnings = Vec::new();
    let mut columns: Option<(usize, usize)> = None;
    let mut first = true;

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_record(line);

        if first {
            first = false;
            if let Some(cols) = header_columns(&fields) {
                columns = Some(cols);
                continue;
            }
        }

        let (name_col, value_col) = columns.unwrap_or((0, 1));
        let (Some(name), Some(value)) = (fields.get(name_col), fields.get(value_col)) else {
            warnings.push(format!("{}:{} expected 2 columns, skipping row", source, idx + 1));
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            warnings.push(format!("{}:{} empty parameter name, skipping row", source, idx + 1));
            continue;
        }
        if !record.insert(name, ParamValue::parse(value)) {
            warnings.push(format!(
                "{}:{} duplicate parameter '{}' (kept first)",
                source,
                idx + 1,
                name
            ));
        }
    }

    ParamFile { record, warnings }
}

fn header_columns(fields: &[String]) -> Option<(usize, usize)> {
    let find = |accepted: &[&str]| {
        fields
            .iter()
            .position(|f| accepted.contains(&f.trim().to_lowercase().as_str()))
    };
    let name_col = find(&["parameter", "parameters", "name"])?;
    let value_col = find(&["value", "values"])?;
    Some((name_col, value_col))
}

pub fn write_params(path: &Path, record: &ParamRecord) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "Parameter,Value")?;
    for (name, value) in record.iter() {
        writeln!(w, "{}", join_record(&[name.to_string(), value.to_string()]))?;
    }
    w.flush()?;
    Ok(())
}

pub fn extract_parameters(
    record: &ParamRecord,
    names: &[String],
) -> Vec<(String, Option<ParamValue>)> {
    names
        .iter()
        .map(|name| {
            let value = record.get(name).cloned();
            if value.is_none() {
                warn!(parameter = %name, "parameter not found");
            }
            (name.clone(), value)
        })
        .collect()
}

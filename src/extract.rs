use std::fmt;
use std::str::FromStr;

use crate::error::ExtractError;
use crate::io::gdat::GdatTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatMode {
    First,
    Last,
    /// Rows `start..end`, clamped to the table.
    Range { start: usize, end: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Scalar(f64),
    Slice(Vec<f64>),
}

impl Extracted {
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Slice(_) => None,
        }
    }
}

impl FromStr for StatMode {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "first" => return Ok(Self::First),
            "last" => return Ok(Self::Last),
            "range" | "range[]" | "range[:]" => return Err(ExtractError::RangeUnspecified),
            _ => {}
        }
        let Some(inner) = s.strip_prefix("range[").and_then(|r| r.strip_suffix(']')) else {
            return Err(ExtractError::UnknownMode(s));
        };
        let Some((start, end)) = inner.split_once(':') else {
            return Err(ExtractError::RangeUnspecified);
        };
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(ExtractError::RangeUnspecified);
        }
        let start = start
            .parse()
            .map_err(|_| ExtractError::UnknownMode(s.clone()))?;
        let end = end
            .parse()
            .map_err(|_| ExtractError::UnknownMode(s.clone()))?;
        Ok(Self::Range { start, end })
    }
}

impl fmt::Display for StatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Last => f.write_str("last"),
            Self::Range { start, end } => write!(f, "range[{}:{}]", start, end),
        }
    }
}

pub fn extract(
    table: &GdatTable,
    variable: &str,
    mode: StatMode,
) -> Result<Extracted, ExtractError> {
    let col = table
        .column(variable)
        .ok_or_else(|| ExtractError::VariableNotFound(variable.to_string()))?;
    let rows = table.rows();
    match mode {
        StatMode::First => Ok(Extracted::Scalar(
            rows.first().map_or(f64::NAN, |row| row[col]),
        )),
        StatMode::Last => Ok(Extracted::Scalar(
            rows.last().map_or(f64::NAN, |row| row[col]),
        )),
        StatMode::Range { start, end } => {
            let end = end.min(rows.len());
            let start = start.min(end);
            Ok(Extracted::Slice(
                rows[start..end].iter().map(|row| row[col]).collect(),
            ))
        }
    }
}

/// Scalar statistic for group comparisons; a range reduces to its mean.
pub fn extract_scalar(
    table: &GdatTable,
    variable: &str,
    mode: StatMode,
) -> Result<f64, ExtractError> {
    match extract(table, variable, mode)? {
        Extracted::Scalar(v) => Ok(v),
        Extracted::Slice(values) if values.is_empty() => Ok(f64::NAN),
        Extracted::Slice(values) => Ok(values.iter().sum::<f64>() / values.len() as f64),
    }
}

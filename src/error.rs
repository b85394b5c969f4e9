use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GdatError {
    #[error("{path}: file is empty")]
    Empty { path: PathBuf },

    #[error("{path}: header has no variable names")]
    BadHeader { path: PathBuf },

    #[error("{path}: only one data row (one-dimensional data)")]
    OneDimensional { path: PathBuf },

    #[error("{path}:{line} expected {expected} columns, found {found}")]
    RowWidth {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{path}:{line} invalid number '{token}'")]
    ParseFloat {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("variable '{0}' not found in header")]
    VariableNotFound(String),

    #[error("'range' requires both start and end (use range[START:END])")]
    RangeUnspecified,

    #[error("unknown statistic '{0}' (use first, last or range[START:END])")]
    UnknownMode(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("no series to aggregate")]
    NoSeries,

    #[error("series {index} has {found} points, expected {expected} (time sampling differs between runs)")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("not enough data in group '{group}': {found} values, need at least {needed}")]
    InsufficientSamples {
        group: String,
        found: usize,
        needed: usize,
    },

    #[error("need at least {needed} groups, got {found}")]
    InsufficientGroups { found: usize, needed: usize },

    #[error("{0}")]
    Degenerate(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum SweepError {
    #[error("override parameters not recognised by the model: {}", .0.join(", "))]
    UnknownParameters(Vec<String>),

    #[error("invalid sweep parameter '{0}' (expected NAME=v1,v2,...)")]
    InvalidSpec(String),
}

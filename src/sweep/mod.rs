//! Parameter sweeps: run a model once per combination of override values.
//!
//! Combinations are visited in Cartesian-product order (first parameter
//! slowest, last fastest), sequentially, one model run each. Nothing is
//! retried and no result is collected; a failing run stops the sweep.

mod command;

pub use command::CommandRunner;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::error::SweepError;
use crate::io::params::{ParamRecord, ParamValue};

pub trait ModelRunner {
    fn run(&mut self, overrides: &ParamRecord) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamGrid {
    entries: Vec<(String, Vec<ParamValue>)>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, values: Vec<ParamValue>) -> Result<(), SweepError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SweepError::InvalidSpec(name.to_string()));
        }
        if self.entries.iter().any(|(n, _)| n == name) {
            return Err(SweepError::InvalidSpec(format!("{} (given twice)", name)));
        }
        self.entries.push((name.to_string(), values));
        Ok(())
    }

    pub fn push_spec(&mut self, spec: &str) -> Result<(), SweepError> {
        let (name, values) = parse_spec(spec)?;
        self.push(&name, values)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn n_combinations(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).product()
    }

    /// Full Cartesian product; an empty grid yields one empty combination,
    /// any empty value list yields none.
    pub fn combinations(&self) -> Vec<ParamRecord> {
        let total = self.n_combinations();
        let mut out = Vec::with_capacity(total);
        for mut k in 0..total {
            // Mixed-radix decomposition with the last parameter fastest.
            let mut picks = vec![0usize; self.entries.len()];
            for (slot, (_, values)) in picks.iter_mut().zip(&self.entries).rev() {
                *slot = k % values.len();
                k /= values.len();
            }
            let mut record = ParamRecord::new();
            for ((name, values), pick) in self.entries.iter().zip(picks) {
                record.insert(name, values[pick].clone());
            }
            out.push(record);
        }
        out
    }
}

pub fn parse_spec(spec: &str) -> Result<(String, Vec<ParamValue>), SweepError> {
    let Some((name, values)) = spec.split_once('=') else {
        return Err(SweepError::InvalidSpec(spec.to_string()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(SweepError::InvalidSpec(spec.to_string()));
    }
    let values: Vec<ParamValue> = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ParamValue::parse)
        .collect();
    if values.is_empty() {
        return Err(SweepError::InvalidSpec(spec.to_string()));
    }
    Ok((name.to_string(), values))
}

pub fn validate_overrides(grid: &ParamGrid, known: &[String]) -> Result<(), SweepError> {
    let unknown: Vec<String> = grid
        .names()
        .filter(|n| !known.iter().any(|k| k == n))
        .map(str::to_string)
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(SweepError::UnknownParameters(unknown))
    }
}

pub fn run_sweep<R: ModelRunner + ?Sized>(
    grid: &ParamGrid,
    runner: &mut R,
    known: Option<&[String]>,
) -> Result<usize> {
    match known {
        Some(known) => validate_overrides(grid, known)?,
        None => warn!("parameter names are not validated against the model; unknown names run with model defaults"),
    }

    let combinations = grid.combinations();
    let total = combinations.len();
    for (i, overrides) in combinations.iter().enumerate() {
        let shown = describe(overrides);
        info!(run = i + 1, total, overrides = %shown, "sweep run started");
        runner
            .run(overrides)
            .with_context(|| format!("sweep run {}/{} failed ({})", i + 1, total, shown))?;
        info!(run = i + 1, total, "sweep run finished");
    }
    Ok(total)
}

pub fn describe(overrides: &ParamRecord) -> String {
    overrides
        .iter()
        .map(|(n, v)| format!("{}={}", n, v))
        .collect::<Vec<_>>()
        .join(", ")
}

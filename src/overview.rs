use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::extract::{StatMode, extract_scalar};
use crate::input::{find_param_file, is_gdat, run_dirs};
use crate::io::delimited::join_record;
use crate::io::gdat::read_gdat;
use crate::io::params::{ParamRecord, read_params};

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewRow {
    pub run_id: String,
    pub date: Option<String>,
    pub seed: Option<String>,
    pub params: ParamRecord,
    /// `None` when the run has no usable `.gdat` or lacks the variable.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdColumns {
    pub kon: String,
    pub koff: String,
}

impl FromStr for KdColumns {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(',') {
            Some((kon, koff)) if !kon.trim().is_empty() && !koff.trim().is_empty() => Ok(Self {
                kon: kon.trim().to_string(),
                koff: koff.trim().to_string(),
            }),
            _ => Err(format!("expected KON,KOFF, got '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Overview {
    pub variable: String,
    pub rows: Vec<OverviewRow>,
    pub warnings: Vec<String>,
    pub kd: Option<KdColumns>,
}

impl Overview {
    pub fn param_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for name in row.params.names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        columns
    }

    /// `koff / kon` of a run; `None` when either is missing, not numeric or
    /// the ratio is not finite.
    pub fn kd_value(&self, row: &OverviewRow) -> Option<f64> {
        let kd = self.kd.as_ref()?;
        let kon = row.params.get(&kd.kon)?.as_f64()?;
        let koff = row.params.get(&kd.koff)?.as_f64()?;
        Some(koff / kon).filter(|v| v.is_finite())
    }

    pub fn to_csv(&self) -> String {
        let columns = self.param_columns();
        let mut header = vec!["Run ID".to_string(), "Date".to_string(), "Seed".to_string()];
        header.extend(columns.iter().cloned());
        header.push(self.variable.clone());
        if self.kd.is_some() {
            header.push("kd".to_string());
        }

        let mut out = join_record(&header);
        out.push('\n');
        for row in &self.rows {
            let mut fields = vec![
                row.run_id.clone(),
                row.date.clone().unwrap_or_default(),
                row.seed.clone().unwrap_or_default(),
            ];
            for name in &columns {
                fields.push(row.params.get(name).map(|v| v.to_string()).unwrap_or_default());
            }
            fields.push(row.value.map_or_else(|| "NaN".to_string(), |v| v.to_string()));
            if self.kd.is_some() {
                fields.push(self.kd_value(row).map(|v| v.to_string()).unwrap_or_default());
            }
            out.push_str(&join_record(&fields));
            out.push('\n');
        }
        out
    }
}

/// Date is the second `_`-separated token of the folder name, seed the last.
pub fn run_metadata(folder_name: &str) -> (Option<String>, Option<String>) {
    let tokens: Vec<&str> = folder_name.split('_').collect();
    if tokens.len() < 2 {
        return (None, None);
    }
    (
        Some(tokens[1].to_string()),
        tokens.last().map(|s| s.to_string()),
    )
}

pub fn build_overview(base: &Path, variable: &str, stat: StatMode) -> Result<Overview> {
    let mut overview = Overview {
        variable: variable.to_string(),
        ..Overview::default()
    };

    for dir in run_dirs(base)? {
        let run_id = dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let (date, seed) = run_metadata(&run_id);
        info!(run = %run_id, "processing run");

        let params = match find_param_file(&dir)? {
            Some(path) => match read_params(&path) {
                Ok(file) => {
                    overview.warnings.extend(file.warnings);
                    file.record
                }
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "parameter file skipped");
                    overview.warnings.push(format!("{:#}", err));
                    ParamRecord::new()
                }
            },
            None => ParamRecord::new(),
        };

        let value = match first_gdat(&dir)? {
            Some(path) => run_statistic(&path, variable, stat, &mut overview.warnings),
            None => {
                overview
                    .warnings
                    .push(format!("{}: no .gdat file", dir.display()));
                None
            }
        };

        overview.rows.push(OverviewRow {
            run_id,
            date,
            seed,
            params,
            value,
        });
    }
    Ok(overview)
}

pub fn write_overview_csv(path: &Path, overview: &Overview) -> Result<()> {
    std::fs::write(path, overview.to_csv())
        .with_context(|| format!("failed to write {}", path.display()))
}

fn first_gdat(dir: &Path) -> Result<Option<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_gdat(p))
        .collect();
    files.sort();
    Ok(files.into_iter().next())
}

fn run_statistic(
    path: &Path,
    variable: &str,
    stat: StatMode,
    warnings: &mut Vec<String>,
) -> Option<f64> {
    let table = match read_gdat(path) {
        Ok(table) => table,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "gdat skipped");
            warnings.push(err.to_string());
            return None;
        }
    };
    match extract_scalar(&table, variable, stat) {
        Ok(v) if v.is_finite() => Some(v),
        Ok(_) => None,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "statistic unavailable");
            warnings.push(format!("{}: {}", path.display(), err));
            None
        }
    }
}

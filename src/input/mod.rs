use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFiles {
    pub id: String,
    pub dir: PathBuf,
    pub gdat: PathBuf,
    pub params: Option<PathBuf>,
}

pub fn is_gdat(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
        return false;
    };
    let lower = name.to_lowercase();
    lower.ends_with(".gdat") || lower.ends_with(".gdat.gz")
}

pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

pub fn find_files(root: &Path, filter: fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("input folder {} does not exist", root.display());
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && filter(entry.path()) {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

pub fn discover_runs(root: &Path) -> Result<Vec<RunFiles>> {
    let gdat_files = find_files(root, is_gdat)?;
    let mut runs = Vec::with_capacity(gdat_files.len());
    for gdat in gdat_files {
        let dir = gdat.parent().map(Path::to_path_buf).unwrap_or_default();
        let params = find_param_file(&dir)?;
        runs.push(RunFiles {
            id: run_id(root, &gdat),
            dir,
            gdat,
            params,
        });
    }
    Ok(runs)
}

/// Parameter file of one run directory: the first `*_parameters.csv`, else
/// the first `.csv` (sorted by name).
pub fn find_param_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut csvs: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_csv(p))
        .collect();
    csvs.sort();
    let preferred = csvs.iter().position(|p| {
        p.file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.to_lowercase().ends_with("_parameters.csv"))
    });
    Ok(match preferred {
        Some(i) => Some(csvs.swap_remove(i)),
        None => csvs.into_iter().next(),
    })
}

pub fn run_dirs(base: &Path) -> Result<Vec<PathBuf>> {
    if !base.is_dir() {
        bail!("base folder {} does not exist", base.display());
    }
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(base)
        .with_context(|| format!("failed to list {}", base.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn run_id(root: &Path, gdat: &Path) -> String {
    let rel = gdat.strip_prefix(root).unwrap_or(gdat);
    let mut id = rel.to_string_lossy().replace('\\', "/");
    for suffix in [".gz", ".gdat"] {
        if let Some(stripped) = id.strip_suffix(suffix) {
            id = stripped.to_string();
        }
    }
    id
}

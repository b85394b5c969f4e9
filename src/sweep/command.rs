use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::io::params::{ParamRecord, write_params};
use crate::sweep::ModelRunner;

pub const PARAMS_PLACEHOLDER: &str = "{params}";

/// Runs an external program once per combination.
///
/// Each run gets its overrides written to
/// `<work_dir>/sweep_NNNN_parameters.csv`; `{params}` in any argument is
/// replaced with that path and `NAME=VALUE` arguments are appended.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
    work_dir: PathBuf,
    runs: usize,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>, work_dir: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            work_dir,
            runs: 0,
        }
    }

    pub fn params_path(&self, run: usize) -> PathBuf {
        self.work_dir.join(params_file_name(run))
    }

    pub fn build_args(&self, overrides: &ParamRecord, params_path: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(PARAMS_PLACEHOLDER, params_path))
            .collect();
        args.extend(overrides.iter().map(|(n, v)| format!("{}={}", n, v)));
        args
    }
}

fn params_file_name(run: usize) -> String {
    format!("sweep_{:04}_parameters.csv", run)
}

impl ModelRunner for CommandRunner {
    fn run(&mut self, overrides: &ParamRecord) -> Result<()> {
        self.runs += 1;
        std::fs::create_dir_all(&self.work_dir)
            .with_context(|| format!("failed to create {}", self.work_dir.display()))?;
        // The child runs inside work_dir, so a relative path would resolve twice.
        let work_dir = self
            .work_dir
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", self.work_dir.display()))?;
        let params_path = work_dir.join(params_file_name(self.runs));
        write_params(&params_path, overrides)?;

        let args = self.build_args(overrides, &params_path.display().to_string());
        info!(program = %self.program, args = ?args, "spawning model");
        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(&work_dir)
            .status()
            .with_context(|| format!("failed to start {}", self.program))?;
        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::{Ctx, LoadedRun};
use crate::io::gdat::read_gdat;
use crate::io::params::read_params;
use crate::pipeline::Stage;

pub struct Stage2Load;

impl Stage2Load {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Load {
    fn name(&self) -> &'static str {
        "stage2_load"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let discovered = std::mem::take(&mut ctx.discovered);
        let total = discovered.len();
        for (group, files) in discovered {
            let table = match read_gdat(&files.gdat) {
                Ok(table) => table,
                Err(err) => {
                    warn!(file = %files.gdat.display(), error = %err, "gdat skipped");
                    ctx.record_warning(err.to_string());
                    continue;
                }
            };
            for w in &table.warnings {
                ctx.record_warning(format!("{}: {}", files.gdat.display(), w));
            }

            let params = match &files.params {
                Some(path) => match read_params(path) {
                    Ok(file) => {
                        for w in file.warnings {
                            ctx.record_warning(w);
                        }
                        Some(file.record)
                    }
                    Err(err) => {
                        warn!(file = %path.display(), error = %err, "parameter file skipped");
                        ctx.record_warning(format!("{:#}", err));
                        None
                    }
                },
                None => None,
            };

            ctx.runs.push(LoadedRun {
                group,
                files,
                table,
                params,
            });
        }
        info!(loaded = ctx.runs.len(), found = total, "runs_loaded");
        Ok(())
    }
}

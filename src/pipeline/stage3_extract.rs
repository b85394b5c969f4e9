use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::ctx::{Ctx, RunValue};
use crate::extract::extract_scalar;
use crate::hypothesis::GroupValues;
use crate::pipeline::Stage;

pub struct Stage3Extract;

impl Stage3Extract {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Extract {
    fn name(&self) -> &'static str {
        "stage3_extract"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !ctx.analysis.uses_statistic() {
            return Ok(());
        }
        let Some(variable) = ctx.variables.first().cloned() else {
            bail!("a variable is required for {}", ctx.analysis.as_str());
        };

        let mut run_values = Vec::with_capacity(ctx.runs.len());
        let mut group_values: Vec<GroupValues> = ctx
            .groups
            .iter()
            .map(|g| GroupValues::new(g.name.clone(), Vec::new()))
            .collect();
        let mut warnings = Vec::new();

        for run in &ctx.runs {
            let group_name = &ctx.groups[run.group].name;
            let value = match extract_scalar(&run.table, &variable, ctx.stat) {
                Ok(v) if v.is_finite() => Some(v),
                Ok(_) => {
                    warn!(file = %run.files.gdat.display(), "statistic is not finite");
                    warnings.push(format!(
                        "{}: {} of '{}' is not a finite number",
                        run.files.gdat.display(),
                        ctx.stat,
                        variable
                    ));
                    None
                }
                Err(err) => {
                    warn!(file = %run.files.gdat.display(), error = %err, "variable skipped");
                    warnings.push(format!("{}: {}", run.files.gdat.display(), err));
                    None
                }
            };
            if let Some(v) = value {
                group_values[run.group].values.push(v);
            }
            run_values.push(RunValue {
                group: group_name.clone(),
                run: run.files.id.clone(),
                value,
            });
        }

        for g in &group_values {
            info!(group = %g.name, values = g.len(), "statistic_extracted");
        }
        for w in warnings {
            ctx.record_warning(w);
        }
        ctx.run_values = run_values;
        ctx.group_values = group_values;
        Ok(())
    }
}

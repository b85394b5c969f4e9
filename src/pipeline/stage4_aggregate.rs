use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::math::aggregate::aggregate;
use crate::pipeline::Stage;
use crate::plot::compare::GroupMeans;
use crate::plot::mean::MeanTrace;
use crate::schema::v1::Analysis;

pub struct Stage4Aggregate;

impl Stage4Aggregate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Aggregate {
    fn name(&self) -> &'static str {
        "stage4_aggregate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !matches!(ctx.analysis, Analysis::Mean | Analysis::Compare) {
            return Ok(());
        }
        let variables = ctx.effective_variables();
        let mut means = Vec::with_capacity(ctx.groups.len());
        let mut warnings = Vec::new();

        for (idx, group) in ctx.groups.iter().enumerate() {
            let mut traces = Vec::with_capacity(variables.len());
            for variable in &variables {
                let mut time = None;
                let mut series = Vec::new();
                for run in ctx.runs_of(idx) {
                    match run.table.series(variable) {
                        Some(values) => {
                            if time.is_none() {
                                time = Some(run.table.time());
                            }
                            series.push(values);
                        }
                        None => {
                            warn!(file = %run.files.gdat.display(), variable = %variable, "variable not found");
                            warnings.push(format!(
                                "{}: variable '{}' not found",
                                run.files.gdat.display(),
                                variable
                            ));
                        }
                    }
                }
                let Some(time) = time else {
                    warnings.push(format!(
                        "group '{}': no run contains '{}'",
                        group.name, variable
                    ));
                    continue;
                };
                let aggregate = aggregate(&series).with_context(|| {
                    format!("cannot average '{}' in group '{}'", variable, group.name)
                })?;
                info!(
                    group = %group.name,
                    variable = %variable,
                    series = aggregate.n_series,
                    "series_aggregated"
                );
                traces.push(MeanTrace {
                    variable: variable.clone(),
                    time,
                    aggregate,
                });
            }
            means.push(GroupMeans {
                group: group.name.clone(),
                traces,
            });
        }

        for w in warnings {
            ctx.record_warning(w);
        }
        ctx.means = means;
        Ok(())
    }
}

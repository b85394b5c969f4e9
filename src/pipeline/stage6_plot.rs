use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::plot::bar::{BarPlot, render_bar};
use crate::plot::boxplot::render_boxplot;
use crate::plot::compare::render_compare;
use crate::plot::mean::render_mean;
use crate::plot::traces::{RunTrace, TracesPlot, legend_label, render_traces};
use crate::schema::v1::Analysis;

pub struct Stage6Plot;

impl Stage6Plot {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Plot {
    fn name(&self) -> &'static str {
        "stage6_plot"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !ctx.plot {
            return Ok(());
        }
        let Some(path) = ctx.output.plot_path.clone() else {
            return Ok(());
        };

        match ctx.analysis {
            Analysis::Traces => {
                let runs = build_run_traces(ctx);
                if runs.is_empty() {
                    warn!("nothing to plot");
                    return Ok(());
                }
                let plot = TracesPlot {
                    title: &ctx.traces.title,
                    style: ctx.traces.style,
                    color_by: &ctx.traces.color_by,
                    palette: &ctx.palette,
                };
                render_traces(&path, &plot, &runs)?;
            }
            Analysis::Mean => {
                let traces = ctx.means.first().map(|g| g.traces.as_slice()).unwrap_or(&[]);
                if traces.is_empty() {
                    warn!("nothing to plot");
                    return Ok(());
                }
                render_mean(&path, "Mean trace", &ctx.palette, traces)?;
            }
            Analysis::Compare => {
                if ctx.means.iter().all(|g| g.traces.is_empty()) {
                    warn!("nothing to plot");
                    return Ok(());
                }
                let names: Vec<&str> = ctx.means.iter().map(|g| g.group.as_str()).collect();
                let title = format!("Mean comparison: {}", names.join(" vs "));
                render_compare(&path, &title, &ctx.means)?;
            }
            Analysis::Anova => {
                let variable = ctx.variables.first().map(String::as_str).unwrap_or_default();
                render_boxplot(&path, variable, &ctx.group_values)?;
            }
            Analysis::Ttest => {
                let variable = ctx.variables.first().map(String::as_str).unwrap_or_default();
                let names: Vec<&str> = ctx.group_values.iter().map(|g| g.name.as_str()).collect();
                let versus = names.join(" vs ");
                let title = format!("Comparison of total {}: {}", variable, versus);
                let plot = BarPlot {
                    title: &title,
                    x_desc: &versus,
                    p_value: ctx.two_sample.as_ref().map(|r| r.p_value),
                };
                render_bar(&path, &plot, &ctx.group_values)?;
            }
            Analysis::Normality => return Ok(()),
        }

        info!(path = %path.display(), "plot_written");
        ctx.plot_written = Some(path);
        Ok(())
    }
}

fn build_run_traces(ctx: &mut Ctx) -> Vec<RunTrace> {
    let color_param = ctx.traces.color_by.param().map(str::to_string);
    let mut traces = Vec::with_capacity(ctx.runs.len());
    let mut warnings = Vec::new();

    for run in &ctx.runs {
        let wanted: Vec<String> = if ctx.variables.is_empty() {
            run.table.names().to_vec()
        } else {
            ctx.variables.clone()
        };
        let mut series = Vec::with_capacity(wanted.len());
        for var in wanted {
            match run.table.series(&var) {
                Some(values) => series.push((var, values)),
                None => {
                    warn!(file = %run.files.gdat.display(), variable = %var, "variable not found");
                    warnings.push(format!(
                        "{}: variable '{}' not found",
                        run.files.gdat.display(),
                        var
                    ));
                }
            }
        }
        if series.is_empty() {
            continue;
        }

        let file_name = run
            .files
            .gdat
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| run.files.id.clone());
        let color_value = color_param.as_deref().and_then(|name| {
            run.params
                .as_ref()
                .and_then(|p| p.get(name))
                .and_then(|v| v.as_f64())
        });
        traces.push(RunTrace {
            label: legend_label(run.params.as_ref(), &ctx.traces.legend_params, &file_name),
            time: run.table.time(),
            series,
            color_value,
        });
    }

    for w in warnings {
        ctx.record_warning(w);
    }
    traces
}

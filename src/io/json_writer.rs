use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::math::stats;
use crate::schema::v1::{
    AnalysisReportV1, AnovaEntry, FinalValue, GroupSummary, NormalityEntry, TukeyEntry,
    TwoSampleEntry,
};

pub fn build_report(ctx: &Ctx) -> AnalysisReportV1 {
    let mut report = AnalysisReportV1::empty(&ctx.tool_version, ctx.analysis);
    report.variables = ctx.effective_variables();
    if ctx.analysis.uses_statistic() {
        report.statistic = Some(ctx.stat.to_string());
    }

    report.groups = ctx
        .groups
        .iter()
        .enumerate()
        .map(|(idx, g)| {
            let values = ctx
                .group_values
                .iter()
                .find(|v| v.name == g.name)
                .map(|v| v.values.clone())
                .unwrap_or_default();
            GroupSummary {
                name: g.name.clone(),
                root: g.root.display().to_string(),
                runs: ctx.runs_of(idx).count() as u64,
                n_values: values.len() as u64,
                mean: finite(stats::mean(&values)),
                std: finite(stats::std_dev(&values)),
                sem: finite(stats::sem(&values)),
                median: finite(stats::median(&values)),
                values,
            }
        })
        .collect();

    report.normality = ctx
        .normality
        .iter()
        .map(|r| NormalityEntry {
            group: r.group.clone(),
            n: r.n as u64,
            w: r.w,
            p_value: r.p_value,
            normal: r.normal,
        })
        .collect();

    report.anova = ctx.anova.as_ref().map(|a| AnovaEntry {
        f_statistic: finite(a.f_statistic),
        p_value: a.p_value,
        df_between: a.df_between,
        df_within: a.df_within,
        significant: a.significant,
        tukey: a.tukey.as_ref().map(|pairs| {
            pairs
                .iter()
                .map(|p| TukeyEntry {
                    group1: p.group1.clone(),
                    group2: p.group2.clone(),
                    mean_diff: p.mean_diff,
                    q: finite(p.q),
                    p_adj: p.p_adj,
                    reject: p.reject,
                })
                .collect()
        }),
    });

    report.two_sample = ctx.two_sample.as_ref().map(|t| TwoSampleEntry {
        test: t.test.label().to_string(),
        group1: t.group1.clone(),
        group2: t.group2.clone(),
        statistic: t.statistic,
        df: t.df,
        p_value: t.p_value,
        significant: t.significant,
    });

    let labelled = ctx.means.len() > 1;
    report.final_values = ctx
        .means
        .iter()
        .flat_map(|g| {
            g.traces.iter().filter_map(move |t| {
                let (mean, std) = t.aggregate.final_point()?;
                Some(FinalValue {
                    group: labelled.then(|| g.group.clone()),
                    variable: t.variable.clone(),
                    mean,
                    std,
                    n_series: t.aggregate.n_series as u64,
                })
            })
        })
        .collect();

    report.plot_path = ctx
        .plot_written
        .as_ref()
        .map(|p| p.display().to_string());
    report.warnings = ctx.warnings.clone();
    report
}

pub fn write_json(path: &Path, report: &AnalysisReportV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::{Ctx, RunValue};
use crate::io::delimited::join_record;
use crate::schema::v1::Analysis;

pub fn write_summary_csv(path: &Path, values: &[RunValue]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "group,run,value")?;
    for v in values {
        let value = v.value.map_or_else(|| "NaN".to_string(), |x| x.to_string());
        writeln!(w, "{}", join_record(&[v.group.as_str(), v.run.as_str(), value.as_str()]))?;
    }
    w.flush()?;
    Ok(())
}

pub fn format_summary(ctx: &Ctx) -> String {
    let mut out = String::new();
    out.push_str(&format!("gdat-tools v{} {}\n", env!("CARGO_PKG_VERSION"), ctx.analysis.as_str()));

    if ctx.analysis.uses_statistic() {
        let counts: Vec<String> = ctx
            .group_values
            .iter()
            .map(|g| format!("{}: {} values", g.name, g.len()))
            .collect();
        out.push_str(&format!("{}\n", counts.join(" | ")));
    } else {
        out.push_str(&format!("runs loaded: {}\n", ctx.runs.len()));
    }

    match ctx.analysis {
        Analysis::Normality => {
            for r in &ctx.normality {
                out.push_str(&format!("Shapiro-Wilk test for {}\n", r.group));
                out.push_str(&format!("  W = {:.4}, p = {:.4}\n", r.w, r.p_value));
                if r.normal {
                    out.push_str("  Data appears normally distributed.\n");
                } else {
                    out.push_str("  Data is NOT normally distributed.\n");
                }
            }
        }
        Analysis::Anova => {
            if let Some(a) = &ctx.anova {
                out.push_str(&format!(
                    "ANOVA F-statistic: {:.3}, p-value: {:.3e}\n",
                    a.f_statistic, a.p_value
                ));
                if let Some(pairs) = &a.tukey {
                    out.push_str("Tukey HSD (alpha = 0.05):\n");
                    out.push_str("  group1\tgroup2\tmeandiff\tp-adj\treject\n");
                    for p in pairs {
                        out.push_str(&format!(
                            "  {}\t{}\t{:.4}\t{:.4}\t{}\n",
                            p.group1, p.group2, p.mean_diff, p.p_adj, p.reject
                        ));
                    }
                } else {
                    out.push_str("No significant difference between groups (p >= 0.05).\n");
                }
            }
        }
        Analysis::Ttest => {
            if let Some(t) = &ctx.two_sample {
                out.push_str(&format!(
                    "{} result: statistic = {:.3}, p-value = {:.3}\n",
                    t.test.label(),
                    t.statistic,
                    t.p_value
                ));
            }
        }
        Analysis::Mean | Analysis::Compare => {
            let labelled = ctx.means.len() > 1;
            for g in &ctx.means {
                for t in &g.traces {
                    if let Some((m, s)) = t.aggregate.final_point() {
                        if labelled {
                            out.push_str(&format!("{} - ", g.group));
                        }
                        out.push_str(&format!("{} - Final Value: {:.2} ± {:.2}\n", t.variable, m, s));
                    }
                }
            }
        }
        Analysis::Traces => {}
    }

    if ctx.analysis.uses_statistic() {
        out.push_str(&format!("summary: {}\n", ctx.output.summary_path.display()));
    }
    if let Some(path) = &ctx.plot_written {
        out.push_str(&format!("plot: {}\n", path.display()));
    }
    if ctx.write_json {
        out.push_str(&format!("json: {}\n", ctx.output.json_path.display()));
    }
    out
}

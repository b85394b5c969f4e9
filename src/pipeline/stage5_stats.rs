use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::hypothesis::anova::one_way_anova;
use crate::hypothesis::shapiro::shapiro_group;
use crate::hypothesis::two_sample::compare_two;
use crate::hypothesis::{MIN_SAMPLES, require_samples};
use crate::pipeline::Stage;
use crate::schema::v1::Analysis;

pub struct Stage5Stats;

impl Stage5Stats {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Stats {
    fn name(&self) -> &'static str {
        "stage5_stats"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        match ctx.analysis {
            Analysis::Normality => {
                require_samples(&ctx.group_values, MIN_SAMPLES)
                    .context("cannot test normality")?;
                for group in &ctx.group_values {
                    if group.is_constant() {
                        warn!(group = %group.name, "all values identical; reporting W=1, p=1");
                        ctx.warnings.push(format!(
                            "group '{}': all values are identical, Shapiro-Wilk reports W=1, p=1",
                            group.name
                        ));
                    }
                    let result = shapiro_group(group)
                        .with_context(|| format!("Shapiro-Wilk failed for group '{}'", group.name))?;
                    info!(
                        group = %result.group,
                        w = result.w,
                        p_value = result.p_value,
                        "shapiro_done"
                    );
                    ctx.normality.push(result);
                }
            }
            Analysis::Anova => {
                let result = one_way_anova(&ctx.group_values).context("cannot run ANOVA")?;
                info!(
                    f = result.f_statistic,
                    p_value = result.p_value,
                    tukey = result.tukey.is_some(),
                    "anova_done"
                );
                ctx.anova = Some(result);
            }
            Analysis::Ttest => {
                let [a, b] = ctx.group_values.as_slice() else {
                    bail!(
                        "ttest needs exactly 2 groups, got {}",
                        ctx.group_values.len()
                    );
                };
                let result = compare_two(a, b, ctx.welch).context("cannot compare groups")?;
                info!(
                    test = result.test.label(),
                    statistic = result.statistic,
                    p_value = result.p_value,
                    "two_sample_done"
                );
                ctx.two_sample = Some(result);
            }
            Analysis::Traces | Analysis::Mean | Analysis::Compare => {}
        }
        Ok(())
    }
}

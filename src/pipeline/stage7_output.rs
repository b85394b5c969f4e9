use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{json_writer, summary};
use crate::pipeline::Stage;

pub struct Stage7Output;

impl Stage7Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Output {
    fn name(&self) -> &'static str {
        "stage7_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.analysis.uses_statistic() {
            summary::write_summary_csv(&ctx.output.summary_path, &ctx.run_values)?;
            info!(path = %ctx.output.summary_path.display(), "summary_csv_written");
        }

        ctx.report = json_writer::build_report(ctx);
        if ctx.write_json {
            json_writer::write_json(&ctx.output.json_path, &ctx.report)?;
            info!(path = %ctx.output.json_path.display(), "json_written");
        }

        info!("stage7_output_ready");
        Ok(())
    }
}

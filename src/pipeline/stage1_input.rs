use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::input;
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.groups.is_empty() {
            bail!("no input groups given");
        }
        let mut discovered = Vec::new();
        let mut empty = Vec::new();
        for (idx, group) in ctx.groups.iter().enumerate() {
            let runs = input::discover_runs(&group.root)?;
            info!(
                group = %group.name,
                root = %group.root.display(),
                runs = runs.len(),
                "runs_discovered"
            );
            if runs.is_empty() {
                warn!(group = %group.name, root = %group.root.display(), "no .gdat files found");
                empty.push(format!(
                    "group '{}': no .gdat files under {}",
                    group.name,
                    group.root.display()
                ));
            }
            discovered.extend(runs.into_iter().map(|r| (idx, r)));
        }
        for message in empty {
            ctx.record_warning(message);
        }
        ctx.discovered = discovered;
        Ok(())
    }
}

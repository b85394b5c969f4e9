use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::plot::labels::LabelPlacer;
use crate::plot::mean::{MeanTrace, draw_mean_band};
use crate::plot::palette::group_color;
use crate::plot::{DrawResult, TRACE_CANVAS, build_chart, draw_legend, finish, padded_range};

#[derive(Debug, Clone)]
pub struct GroupMeans {
    pub group: String,
    pub traces: Vec<MeanTrace>,
}

pub fn render_compare(path: &Path, title: &str, groups: &[GroupMeans]) -> Result<()> {
    finish(path, draw(path, title, groups))
}

fn draw(path: &Path, title: &str, groups: &[GroupMeans]) -> DrawResult {
    let all = || groups.iter().flat_map(|g| g.traces.iter());
    let (x0, x1) = padded_range(all().flat_map(|t| t.time.iter().copied()));
    let (y0, y1) = padded_range(all().flat_map(|t| {
        t.aggregate
            .mean
            .iter()
            .zip(&t.aggregate.std)
            .flat_map(|(m, s)| [m - s, m + s])
    }));

    let root = BitMapBackend::new(path, TRACE_CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = build_chart(&root, title, (x0, x1), (y0, y1))?;

    let mut placer = LabelPlacer::for_span(y0, y1, 0.03);
    let mut color_idx = 0;
    for group in groups {
        for trace in &group.traces {
            let label = format!("{} - {}", group.group, trace.variable);
            draw_mean_band(&mut chart, trace, group_color(color_idx), &label, &mut placer)?;
            color_idx += 1;
        }
    }

    draw_legend(&mut chart, SeriesLabelPosition::UpperLeft)?;
    root.present()?;
    Ok(())
}

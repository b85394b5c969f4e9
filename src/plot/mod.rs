pub mod bar;
pub mod boxplot;
pub mod compare;
pub mod format;
pub mod labels;
pub mod mean;
pub mod palette;
pub mod traces;

use std::error::Error;
use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

pub const TRACE_CANVAS: (u32, u32) = (2000, 1200);
pub const STAT_CANVAS: (u32, u32) = (1600, 1200);

pub const TIME_LABEL: &str = "Time (s)";
pub const COUNT_LABEL: &str = "Molecule Count";

pub(crate) const BACKGROUND: RGBColor = RGBColor(211, 211, 211);
pub(crate) const FONT: &str = "sans-serif";

pub(crate) type DrawResult = std::result::Result<(), Box<dyn Error>>;

pub(crate) type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub(crate) fn finish(path: &Path, result: DrawResult) -> Result<()> {
    result.map_err(|e| anyhow::anyhow!("failed to render {}: {}", path.display(), e))
}

pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad, hi + pad);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

pub(crate) fn step_points(time: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(time.len() * 2);
    for (i, (&t, &v)) in time.iter().zip(values).enumerate() {
        if i > 0 {
            if let Some(&(_, prev)) = out.last() {
                out.push((t, prev));
            }
        }
        out.push((t, v));
    }
    out
}

pub(crate) fn build_chart<'a, 'b>(
    root: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    title: &str,
    x: (f64, f64),
    y: (f64, f64),
) -> std::result::Result<Chart<'a, 'b>, Box<dyn Error>> {
    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 40))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(110)
        .build_cartesian_2d(x.0..x.1, y.0..y.1)?;
    chart.plotting_area().fill(&BACKGROUND)?;
    chart
        .configure_mesh()
        .x_desc(TIME_LABEL)
        .y_desc(COUNT_LABEL)
        .label_style((FONT, 22))
        .axis_desc_style((FONT, 26))
        .bold_line_style(WHITE.mix(0.6))
        .light_line_style(WHITE.mix(0.2))
        .draw()?;
    Ok(chart)
}

pub(crate) fn draw_legend<'a, 'b: 'a>(
    chart: &mut Chart<'a, 'b>,
    position: SeriesLabelPosition,
) -> DrawResult {
    chart
        .configure_series_labels()
        .position(position)
        .label_font((FONT, 20))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::hypothesis::GroupValues;
use crate::math::stats;
use crate::plot::palette::group_color;
use crate::plot::{DrawResult, FONT, STAT_CANVAS, finish, padded_range};

const BOX_HALF_WIDTH: f64 = 0.3;
const JITTER: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_lo: f64,
    pub whisker_hi: f64,
    pub mean: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Self {
        let q1 = stats::quantile(values, 0.25);
        let q3 = stats::quantile(values, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
        let inside = values.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let whisker_lo = inside.clone().fold(f64::INFINITY, f64::min);
        let whisker_hi = inside.fold(f64::NEG_INFINITY, f64::max);
        Self {
            q1,
            median: stats::median(values),
            q3,
            whisker_lo: if whisker_lo.is_finite() { whisker_lo } else { q1 },
            whisker_hi: if whisker_hi.is_finite() { whisker_hi } else { q3 },
            mean: stats::mean(values),
        }
    }
}

pub fn jitter_offset(j: usize) -> f64 {
    let golden = (j as f64 * 0.618_033_988_749_895).fract();
    (golden - 0.5) * 2.0 * JITTER
}

pub fn render_boxplot(path: &Path, variable: &str, groups: &[GroupValues]) -> Result<()> {
    finish(path, draw(path, variable, groups))
}

fn draw(path: &Path, variable: &str, groups: &[GroupValues]) -> DrawResult {
    let k = groups.len().max(1) as f64;
    let (y0, y1) = padded_range(groups.iter().flat_map(|g| g.values.iter().copied()));
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();

    let root = BitMapBackend::new(path, STAT_CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(variable, (FONT, 40))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(110)
        .build_cartesian_2d(-0.5..(k - 0.5), y0..y1)?;

    let category = |x: &f64| {
        let i = x.round();
        if (x - i).abs() < 1e-6 && i >= 0.0 {
            names.get(i as usize).map(|s| s.to_string()).unwrap_or_default()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .x_labels(groups.len().max(1) * 2 + 1)
        .x_label_formatter(&category)
        .y_desc("Final Molecule Count")
        .label_style((FONT, 24))
        .axis_desc_style((FONT, 26))
        .bold_line_style(BLACK.mix(0.25))
        .light_line_style(BLACK.mix(0.08))
        .draw()?;

    for (i, group) in groups.iter().enumerate() {
        let x = i as f64;
        let color = group_color(i);
        let b = BoxStats::from_values(&group.values);

        chart.draw_series([
            PathElement::new(vec![(x, b.whisker_lo), (x, b.q1)], BLACK.stroke_width(2)),
            PathElement::new(vec![(x, b.q3), (x, b.whisker_hi)], BLACK.stroke_width(2)),
            PathElement::new(
                vec![(x - BOX_HALF_WIDTH / 2.0, b.whisker_lo), (x + BOX_HALF_WIDTH / 2.0, b.whisker_lo)],
                BLACK.stroke_width(2),
            ),
            PathElement::new(
                vec![(x - BOX_HALF_WIDTH / 2.0, b.whisker_hi), (x + BOX_HALF_WIDTH / 2.0, b.whisker_hi)],
                BLACK.stroke_width(2),
            ),
        ])?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - BOX_HALF_WIDTH, b.q1), (x + BOX_HALF_WIDTH, b.q3)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - BOX_HALF_WIDTH, b.q1), (x + BOX_HALF_WIDTH, b.q3)],
            BLACK.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x - BOX_HALF_WIDTH, b.median), (x + BOX_HALF_WIDTH, b.median)],
            BLACK.stroke_width(3),
        )))?;

        chart.draw_series(group.values.iter().enumerate().map(|(j, v)| {
            Circle::new((x + jitter_offset(j), *v), 6, BLACK.mix(0.6).filled())
        }))?;

        chart.draw_series(DashedLineSeries::new(
            vec![(x - 0.4, b.mean), (x + 0.4, b.mean)],
            12,
            8,
            RGBColor(128, 128, 128).stroke_width(3),
        ))?;
    }

    root.present()?;
    Ok(())
}

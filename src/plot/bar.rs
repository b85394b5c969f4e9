use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::hypothesis::GroupValues;
use crate::math::stats;
use crate::plot::palette::group_color;
use crate::plot::{COUNT_LABEL, DrawResult, FONT, STAT_CANVAS, finish};

const BAR_HALF_WIDTH: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct BarPlot<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub p_value: Option<f64>,
}

pub fn render_bar(path: &Path, plot: &BarPlot<'_>, groups: &[GroupValues]) -> Result<()> {
    finish(path, draw(path, plot, groups))
}

fn draw(path: &Path, plot: &BarPlot<'_>, groups: &[GroupValues]) -> DrawResult {
    let bars: Vec<(f64, f64)> = groups
        .iter()
        .map(|g| (stats::mean(&g.values), stats::sem(&g.values)))
        .collect();
    let top = bars
        .iter()
        .map(|(m, s)| m + s)
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);
    let bottom = bars
        .iter()
        .map(|(m, s)| m - s)
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::min);
    let y_hi = if top > 0.0 { top * 1.2 } else { 1.0 };
    let k = groups.len().max(1) as f64;
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();

    let root = BitMapBackend::new(path, STAT_CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(plot.title, (FONT, 36))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(110)
        .build_cartesian_2d(-0.5..(k - 0.5), bottom..y_hi)?;

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
        .disable_x_mesh()
        .x_labels(groups.len().max(1) * 2 + 1)
        .x_label_formatter(&category)
        .x_desc(plot.x_desc)
        .y_desc(COUNT_LABEL)
        .label_style((FONT, 24))
        .axis_desc_style((FONT, 26))
        .draw()?;

    for (i, (mean, sem)) in bars.iter().copied().enumerate() {
        let x = i as f64;
        let color = group_color(i);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, mean)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(ErrorBar::new_vertical(
            x,
            mean - sem,
            mean,
            mean + sem,
            BLACK.stroke_width(2),
            20,
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.2} (SEM: {:.2})", mean, sem),
            (x - BAR_HALF_WIDTH, mean + sem + (y_hi - bottom) * 0.02),
            (FONT, 22).into_font(),
        )))?;
    }

    if let Some(p) = plot.p_value {
        chart.draw_series(std::iter::once(Text::new(
            format!("P-value: {:.3}", p),
            ((k - 1.0) / 2.0 - 0.15, top * 1.1),
            (FONT, 26).into_font(),
        )))?;
    }

    root.present()?;
    Ok(())
}

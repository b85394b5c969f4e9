use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::io::params::{ParamRecord, ParamValue};
use crate::plot::format::{format_sci, format_value};
use crate::plot::labels::LabelPlacer;
use crate::plot::palette::{self, Palette, parse_color};
use crate::plot::{
    DrawResult, FONT, TRACE_CANVAS, build_chart, draw_legend, finish, padded_range, step_points,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceStyle {
    #[default]
    Line,
    Step,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColorBy {
    #[default]
    Variable,
    Thresholds { param: String, thresholds: Vec<f64> },
    Continuous { param: String },
}

impl ColorBy {
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::Variable => None,
            Self::Thresholds { param, .. } | Self::Continuous { param } => Some(param),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunTrace {
    pub label: String,
    pub time: Vec<f64>,
    pub series: Vec<(String, Vec<f64>)>,
    pub color_value: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TracesPlot<'a> {
    pub title: &'a str,
    pub style: TraceStyle,
    pub color_by: &'a ColorBy,
    pub palette: &'a Palette,
}

/// `name: 2.00×10^4 - name2: 5` from the selected parameters, or `fallback`
/// when no parameter file exists or none of the names are present.
pub fn legend_label(params: Option<&ParamRecord>, names: &[String], fallback: &str) -> String {
    let Some(record) = params else {
        return fallback.to_string();
    };
    let parts: Vec<String> = names
        .iter()
        .filter_map(|name| {
            record.get(name).map(|value| match value {
                ParamValue::Number(v) => format!("{}: {}", name, format_sci(*v)),
                ParamValue::Text(s) => format!("{}: {}", name, s),
            })
        })
        .collect();
    if parts.is_empty() {
        fallback.to_string()
    } else {
        parts.join(" - ")
    }
}

pub fn threshold_color(value: f64, thresholds: &[f64]) -> RGBColor {
    const NAMES: [&str; 3] = ["rebeccapurple", "mediumslateblue", "lightslategrey"];
    let mut sorted = thresholds.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    for (i, t) in sorted.iter().enumerate() {
        if value >= *t {
            return NAMES
                .get(i)
                .and_then(|name| parse_color(name))
                .unwrap_or(palette::CYCLE[i % palette::CYCLE.len()]);
        }
    }
    BLUE
}

/// Draw (and legend) order: ascending colour parameter, stable, with runs
/// lacking the parameter ranked as 1.
pub fn draw_order(runs: &[RunTrace]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..runs.len()).collect();
    order.sort_by(|&a, &b| {
        let va = runs[a].color_value.unwrap_or(1.0);
        let vb = runs[b].color_value.unwrap_or(1.0);
        va.total_cmp(&vb)
    });
    order
}

pub fn render_traces(path: &Path, plot: &TracesPlot<'_>, runs: &[RunTrace]) -> Result<()> {
    finish(path, draw(path, plot, runs))
}

fn draw(path: &Path, plot: &TracesPlot<'_>, runs: &[RunTrace]) -> DrawResult {
    let (x0, x1) = padded_range(runs.iter().flat_map(|r| r.time.iter().copied()));
    let (y0, y1) = padded_range(
        runs.iter()
            .flat_map(|r| r.series.iter().flat_map(|(_, s)| s.iter().copied())),
    );

    let (c_lo, c_hi) = color_value_range(runs);

    let root = BitMapBackend::new(path, TRACE_CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = build_chart(&root, plot.title, (x0, x1), (y0, y1))?;

    let mut placer = LabelPlacer::for_span(y0, y1, 0.03);
    let multi_var = runs.iter().any(|r| r.series.len() > 1);

    for idx in draw_order(runs) {
        let run = &runs[idx];
        for (var_idx, (var, values)) in run.series.iter().enumerate() {
            let color = match plot.color_by {
                ColorBy::Variable => plot.palette.color_for(var, var_idx),
                ColorBy::Thresholds { thresholds, .. } => {
                    threshold_color(run.color_value.unwrap_or(1.0), thresholds)
                }
                ColorBy::Continuous { .. } => {
                    let v = run.color_value.unwrap_or(c_lo);
                    let t = if c_hi > c_lo { (v - c_lo) / (c_hi - c_lo) } else { 0.0 };
                    palette::viridis(t)
                }
            };
            let points: Vec<(f64, f64)> = match plot.style {
                TraceStyle::Line => run.time.iter().copied().zip(values.iter().copied()).collect(),
                TraceStyle::Step => step_points(&run.time, values),
            };
            let label = if multi_var {
                format!("{} - {}", run.label, var)
            } else {
                run.label.clone()
            };
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(3)));

            if let (Some(&t_end), Some(&v_end)) = (run.time.last(), values.last()) {
                chart.draw_series(std::iter::once(Circle::new((t_end, v_end), 6, color.filled())))?;
                let y = placer.place(v_end);
                chart.draw_series(std::iter::once(Text::new(
                    format_value(v_end),
                    (t_end, y),
                    (FONT, 20).into_font().color(&color),
                )))?;
            }
        }
    }

    draw_legend(&mut chart, SeriesLabelPosition::LowerRight)?;
    root.present()?;
    Ok(())
}

fn color_value_range(runs: &[RunTrace]) -> (f64, f64) {
    let values: Vec<f64> = runs
        .iter()
        .filter_map(|r| r.color_value)
        .filter(|v| v.is_finite())
        .collect();
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

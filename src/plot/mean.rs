use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::math::aggregate::AggregateSeries;
use crate::plot::format::format_value;
use crate::plot::labels::LabelPlacer;
use crate::plot::palette::Palette;
use crate::plot::{
    Chart, DrawResult, FONT, TRACE_CANVAS, build_chart, draw_legend, finish, padded_range,
};

#[derive(Debug, Clone)]
pub struct MeanTrace {
    pub variable: String,
    pub time: Vec<f64>,
    pub aggregate: AggregateSeries,
}

impl MeanTrace {
    fn band_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.aggregate
            .mean
            .iter()
            .zip(&self.aggregate.std)
            .flat_map(|(m, s)| [m - s, m + s])
    }
}

pub fn render_mean(path: &Path, title: &str, palette: &Palette, traces: &[MeanTrace]) -> Result<()> {
    finish(path, draw(path, title, palette, traces))
}

fn draw(path: &Path, title: &str, palette: &Palette, traces: &[MeanTrace]) -> DrawResult {
    let (x0, x1) = padded_range(traces.iter().flat_map(|t| t.time.iter().copied()));
    let (y0, y1) = padded_range(traces.iter().flat_map(|t| t.band_values()));

    let root = BitMapBackend::new(path, TRACE_CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = build_chart(&root, title, (x0, x1), (y0, y1))?;

    let mut placer = LabelPlacer::for_span(y0, y1, 0.03);
    for (idx, trace) in traces.iter().enumerate() {
        let color = palette.color_for(&trace.variable, idx);
        draw_mean_band(&mut chart, trace, color, &trace.variable, &mut placer)?;
    }

    draw_legend(&mut chart, SeriesLabelPosition::UpperLeft)?;
    root.present()?;
    Ok(())
}

pub(crate) fn draw_mean_band<'a, 'b>(
    chart: &mut Chart<'a, 'b>,
    trace: &MeanTrace,
    color: RGBColor,
    label: &str,
    placer: &mut LabelPlacer,
) -> DrawResult {
    let mean = &trace.aggregate.mean;
    let std = &trace.aggregate.std;

    let mut band: Vec<(f64, f64)> = trace
        .time
        .iter()
        .zip(mean.iter().zip(std))
        .map(|(&t, (m, s))| (t, m + s))
        .collect();
    band.extend(
        trace
            .time
            .iter()
            .zip(mean.iter().zip(std))
            .rev()
            .map(|(&t, (m, s))| (t, m - s)),
    );
    chart.draw_series(std::iter::once(Polygon::new(band, color.mix(0.3).filled())))?;

    chart
        .draw_series(LineSeries::new(
            trace.time.iter().copied().zip(mean.iter().copied()),
            color.stroke_width(3),
        ))?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(3)));

    if let (Some(&t_end), Some((m, s))) = (trace.time.last(), trace.aggregate.final_point()) {
        chart.draw_series(std::iter::once(Circle::new((t_end, m), 7, color.filled())))?;
        let y = placer.place(m);
        chart.draw_series(std::iter::once(Text::new(
            format!("{} ± {}", format_value(m), format_value(s)),
            (t_end, y),
            (FONT, 20).into_font().color(&color),
        )))?;
    }
    Ok(())
}

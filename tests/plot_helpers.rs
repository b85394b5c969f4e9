use gdat_tools::io::params::{ParamRecord, ParamValue};
use gdat_tools::plot::boxplot::{BoxStats, jitter_offset};
use gdat_tools::plot::format::{format_sci, format_value};
use gdat_tools::plot::labels::LabelPlacer;
use gdat_tools::plot::palette::{Palette, parse_color, viridis};
use gdat_tools::plot::traces::{RunTrace, draw_order, legend_label, threshold_color};
use plotters::style::RGBColor;
use std::fs;
use tempfile::TempDir;

#[test]
fn labels_keep_minimum_separation() {
    let mut placer = LabelPlacer::new(1.0);
    assert_eq!(placer.place(10.0), 10.0);
    assert_eq!(placer.place(10.0), 11.0);
    assert_eq!(placer.place(10.0), 9.0);
    assert_eq!(placer.place(10.2), 12.2);
    assert_eq!(placer.place(20.0), 20.0);
    let placed = placer.placed();
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            assert!((placed[i] - placed[j]).abs() >= 1.0 - 1e-9);
        }
    }
}

#[test]
fn label_separation_scales_with_span() {
    let mut placer = LabelPlacer::for_span(0.0, 200.0, 0.05);
    placer.place(100.0);
    assert_eq!(placer.place(101.0), 111.0);
}

#[test]
fn scientific_legend_format() {
    assert_eq!(format_sci(20000.0), "2.00×10^4");
    assert_eq!(format_sci(0.005), "5.00×10^-3");
    assert_eq!(format_sci(9.999), "1.00×10^1");
    assert_eq!(format_sci(0.0), "0");
    assert_eq!(format_value(12.345), "12.35");
    assert_eq!(format_value(-250000.0), "-2.50×10^5");
}

#[test]
fn legend_label_from_params() {
    let mut record = ParamRecord::new();
    record.insert("n_A", ParamValue::Number(20000.0));
    record.insert("mode", ParamValue::Text("fast".to_string()));
    let names = vec!["n_A".to_string(), "mode".to_string(), "absent".to_string()];
    assert_eq!(
        legend_label(Some(&record), &names, "run.gdat"),
        "n_A: 2.00×10^4 - mode: fast"
    );
    assert_eq!(legend_label(None, &names, "run.gdat"), "run.gdat");
    assert_eq!(legend_label(Some(&record), &[], "run.gdat"), "run.gdat");
}

#[test]
fn thresholds_bucket_descending() {
    let t = [2e2, 2e4, 2e3];
    assert_eq!(threshold_color(5e4, &t), RGBColor(102, 51, 153));
    assert_eq!(threshold_color(2e3, &t), RGBColor(123, 104, 238));
    assert_eq!(threshold_color(500.0, &t), RGBColor(119, 136, 153));
    assert_eq!(threshold_color(10.0, &t), RGBColor(0, 0, 255));
}

#[test]
fn runs_are_drawn_by_colour_value() {
    let run = |label: &str, v: Option<f64>| RunTrace {
        label: label.to_string(),
        time: vec![0.0, 1.0],
        series: vec![("A".to_string(), vec![0.0, 1.0])],
        color_value: v,
    };
    let runs = vec![run("hi", Some(50.0)), run("none", None), run("lo", Some(0.5))];
    assert_eq!(draw_order(&runs), vec![2, 1, 0]);
}

#[test]
fn palette_overlay_replaces_and_appends() {
    let builtin = Palette::builtin().unwrap();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("colors.tsv");
    fs::write(&path, "# user colours\nNEW_SPECIES\t#102030\n").unwrap();
    let merged = Palette::with_overlay(Some(&path)).unwrap();
    assert_eq!(merged.len(), builtin.len() + 1);
    assert_eq!(merged.get("new_species"), Some(RGBColor(16, 32, 48)));
    assert_eq!(merged.color_for("unlisted", 0), RGBColor(31, 119, 180));
}

#[test]
fn palette_rejects_malformed_rows() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.tsv");
    fs::write(&path, "A\t#000000\nB\n").unwrap();
    let err = Palette::load(&path).unwrap_err();
    assert!(err.to_string().contains(":2 malformed TSV"));
}

#[test]
fn colour_parsing() {
    assert_eq!(parse_color("#FF8000"), Some(RGBColor(255, 128, 0)));
    assert_eq!(parse_color("DodgerBlue"), Some(RGBColor(30, 144, 255)));
    assert_eq!(parse_color("#12345"), None);
    assert_eq!(parse_color("no-such-colour"), None);
    assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
    assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
}

#[test]
fn box_stats_whiskers_exclude_outliers() {
    let b = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
    assert!((b.median - 3.5).abs() < 1e-12);
    assert!((b.q1 - 2.25).abs() < 1e-12);
    assert!((b.q3 - 4.75).abs() < 1e-12);
    assert_eq!(b.whisker_lo, 1.0);
    assert_eq!(b.whisker_hi, 5.0);
}

#[test]
fn jitter_stays_within_band() {
    for j in 0..50 {
        let off = jitter_offset(j);
        assert!(off.abs() <= 0.15 + 1e-12);
    }
    assert_eq!(jitter_offset(3), jitter_offset(3));
}

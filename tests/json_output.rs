use std::path::PathBuf;

use gdat_tools::ctx::{Ctx, GroupSpec};
use gdat_tools::hypothesis::GroupValues;
use gdat_tools::hypothesis::anova::one_way_anova;
use gdat_tools::io::json_writer::{build_report, write_json};
use gdat_tools::plot::palette::Palette;
use gdat_tools::schema::v1::Analysis;
use serde_json::Value;
use tempfile::TempDir;

fn anova_ctx(out: PathBuf) -> Ctx {
    let groups = vec![
        GroupSpec {
            name: "low".to_string(),
            root: PathBuf::from("data/low"),
        },
        GroupSpec {
            name: "high".to_string(),
            root: PathBuf::from("data/high"),
        },
    ];
    let mut ctx = Ctx::new(Analysis::Anova, groups, out, Palette::default(), "0.0.0-test");
    ctx.variables = vec!["A".to_string()];
    ctx.group_values = vec![
        GroupValues::new("low", vec![1.0, 2.0, 3.0]),
        GroupValues::new("high", vec![10.0, 11.0, 12.0]),
    ];
    ctx.anova = Some(one_way_anova(&ctx.group_values).unwrap());
    ctx.record_warning("run_x.gdat: variable 'A' not found");
    ctx
}

#[test]
fn json_report_populated() {
    let tmp = TempDir::new().unwrap();
    let ctx = anova_ctx(tmp.path().to_path_buf());
    let report = build_report(&ctx);
    assert_eq!(report.version, "0.0.0-test");
    assert_eq!(report.statistic.as_deref(), Some("last"));
    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.groups[0].n_values, 3);
    assert_eq!(report.groups[0].mean, Some(2.0));
    assert_eq!(report.groups[1].median, Some(11.0));

    let path = tmp.path().join("report.json");
    write_json(&path, &report).unwrap();
    let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["analysis"], "anova");
    assert_eq!(value["version"], "0.0.0-test");
    assert_eq!(value["variables"][0], "A");
    assert_eq!(value["anova"]["significant"], true);
    assert_eq!(value["anova"]["tukey"][0]["group1"], "low");
    assert_eq!(value["warnings"].as_array().map(|w| w.len()), Some(1));
    assert!(value["two_sample"].is_null());
}

#[test]
fn empty_group_has_no_summary_numbers() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = anova_ctx(tmp.path().to_path_buf());
    ctx.group_values.truncate(1);
    let report = build_report(&ctx);
    assert_eq!(report.groups[1].n_values, 0);
    assert_eq!(report.groups[1].mean, None);
    assert_eq!(report.groups[1].sem, None);
}

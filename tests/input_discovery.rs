use std::fs;

use gdat_tools::input::{discover_runs, find_param_file, is_gdat, run_dirs};
use tempfile::TempDir;

#[test]
fn runs_pair_gdat_with_parameter_csv() {
    let tmp = TempDir::new().unwrap();
    let r1 = tmp.path().join("run_b");
    let r2 = tmp.path().join("run_a").join("nested");
    fs::create_dir_all(&r1).unwrap();
    fs::create_dir_all(&r2).unwrap();
    fs::write(r1.join("model.gdat"), "x").unwrap();
    fs::write(r1.join("aaa.csv"), "x").unwrap();
    fs::write(r1.join("model_parameters.csv"), "x").unwrap();
    fs::write(r2.join("model.gdat.gz"), "x").unwrap();
    fs::write(r2.join("all_variables_plot.png"), "x").unwrap();

    let runs = discover_runs(tmp.path()).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, "run_a/nested/model");
    assert_eq!(runs[0].params, None);
    assert_eq!(runs[1].id, "run_b/model");
    assert_eq!(
        runs[1].params.as_ref().and_then(|p| p.file_name()).and_then(|s| s.to_str()),
        Some("model_parameters.csv")
    );
}

#[test]
fn first_csv_is_the_fallback_parameter_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("b.csv"), "x").unwrap();
    fs::write(tmp.path().join("a.CSV"), "x").unwrap();
    let found = find_param_file(tmp.path()).unwrap().unwrap();
    assert_eq!(found.file_name().and_then(|s| s.to_str()), Some("a.CSV"));
}

#[test]
fn missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(discover_runs(&tmp.path().join("absent")).is_err());
}

#[test]
fn run_dirs_lists_only_directories() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("r2")).unwrap();
    fs::create_dir(tmp.path().join("r1")).unwrap();
    fs::write(tmp.path().join("overview.csv"), "x").unwrap();
    let dirs = run_dirs(tmp.path()).unwrap();
    let names: Vec<_> = dirs
        .iter()
        .filter_map(|d| d.file_name().and_then(|s| s.to_str()))
        .collect();
    assert_eq!(names, vec!["r1", "r2"]);
}

#[test]
fn gdat_extension_is_case_insensitive() {
    assert!(is_gdat(std::path::Path::new("x/Run.GDAT")));
    assert!(is_gdat(std::path::Path::new("x/run.gdat.gz")));
    assert!(!is_gdat(std::path::Path::new("x/run.gdat.bak")));
}

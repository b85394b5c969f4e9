use std::fs;
use std::path::Path;

use gdat_tools::extract::StatMode;
use gdat_tools::overview::{KdColumns, build_overview, run_metadata, write_overview_csv};
use tempfile::TempDir;

fn run_dir(base: &Path, name: &str, gdat: Option<&str>, params: Option<&str>) {
    let dir = base.join(name);
    fs::create_dir_all(&dir).unwrap();
    if let Some(text) = gdat {
        fs::write(dir.join("model.gdat"), text).unwrap();
    }
    if let Some(text) = params {
        fs::write(dir.join("model_parameters.csv"), text).unwrap();
    }
}

#[test]
fn folder_name_gives_date_and_seed() {
    assert_eq!(
        run_metadata("run_2024-03-01_abc_42"),
        (Some("2024-03-01".to_string()), Some("42".to_string()))
    );
    assert_eq!(run_metadata("single"), (None, None));
}

#[test]
fn one_row_per_run_with_param_union() {
    let tmp = TempDir::new().unwrap();
    run_dir(
        tmp.path(),
        "run_0301_1",
        Some("# time A\n0 1\n1 7\n"),
        Some("Parameter,Value\nk_on,1\n"),
    );
    run_dir(
        tmp.path(),
        "run_0302_2",
        Some("# time B\n0 1\n1 2\n"),
        Some("Parameter,Value\nk_off,3\nk_on,2\n"),
    );
    run_dir(tmp.path(), "run_0303_3", None, None);

    let overview = build_overview(tmp.path(), "A", StatMode::Last).unwrap();
    assert_eq!(overview.rows.len(), 3);
    assert_eq!(overview.param_columns(), vec!["k_on", "k_off"]);
    assert_eq!(overview.rows[0].value, Some(7.0));
    assert_eq!(overview.rows[1].value, None);
    assert_eq!(overview.rows[2].value, None);
    assert_eq!(overview.warnings.len(), 2);

    let out = tmp.path().join("overview.csv");
    write_overview_csv(&out, &overview).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Run ID,Date,Seed,k_on,k_off,A");
    assert_eq!(lines[1], "run_0301_1,0301,1,1,,7");
    assert_eq!(lines[2], "run_0302_2,0302,2,2,3,NaN");
    assert_eq!(lines[3], "run_0303_3,0303,3,,,NaN");
}

#[test]
fn missing_base_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(build_overview(&tmp.path().join("absent"), "A", StatMode::Last).is_err());
}

#[test]
fn kd_column_divides_koff_by_kon() {
    let tmp = TempDir::new().unwrap();
    let gdat = Some("# time A\n0 1\n1 7\n");
    run_dir(tmp.path(), "run_a_1", gdat, Some("Parameter,Value\nkon,4\nkoff,2\n"));
    run_dir(tmp.path(), "run_b_2", gdat, Some("Parameter,Value\nkon,4\n"));
    run_dir(tmp.path(), "run_c_3", gdat, Some("Parameter,Value\nkon,fast\nkoff,2\n"));

    let mut overview = build_overview(tmp.path(), "A", StatMode::Last).unwrap();
    overview.kd = Some("kon,koff".parse::<KdColumns>().unwrap());
    assert_eq!(overview.kd_value(&overview.rows[0]), Some(0.5));
    assert_eq!(overview.kd_value(&overview.rows[1]), None);
    assert_eq!(overview.kd_value(&overview.rows[2]), None);

    let csv = overview.to_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Run ID,Date,Seed,kon,koff,A,kd");
    assert_eq!(lines[1], "run_a_1,a,1,4,2,7,0.5");
    assert_eq!(lines[2], "run_b_2,b,2,4,,7,");
    assert_eq!(lines[3], "run_c_3,c,3,fast,2,7,");
}

#[test]
fn kd_needs_two_names() {
    assert!("kon".parse::<KdColumns>().is_err());
    assert!("kon,".parse::<KdColumns>().is_err());
    assert_eq!(
        " kon , koff ".parse::<KdColumns>().unwrap(),
        KdColumns {
            kon: "kon".to_string(),
            koff: "koff".to_string()
        }
    );
}

use anyhow::{Result, bail};
use gdat_tools::error::SweepError;
use gdat_tools::io::params::{ParamRecord, ParamValue};
use gdat_tools::sweep::{
    CommandRunner, ModelRunner, ParamGrid, describe, parse_spec, run_sweep, validate_overrides,
};

#[derive(Default)]
struct Recorder {
    seen: Vec<String>,
    fail_at: Option<usize>,
}

impl ModelRunner for Recorder {
    fn run(&mut self, overrides: &ParamRecord) -> Result<()> {
        if self.fail_at == Some(self.seen.len()) {
            bail!("model crashed");
        }
        self.seen.push(describe(overrides));
        Ok(())
    }
}

fn grid(specs: &[&str]) -> ParamGrid {
    let mut grid = ParamGrid::new();
    for spec in specs {
        grid.push_spec(spec).unwrap();
    }
    grid
}

#[test]
fn first_parameter_varies_slowest() {
    let g = grid(&["a=1,2", "b=x,y,z"]);
    assert_eq!(g.n_combinations(), 6);
    let mut runner = Recorder::default();
    let n = run_sweep(&g, &mut runner, None).unwrap();
    assert_eq!(n, 6);
    assert_eq!(
        runner.seen,
        vec![
            "a=1, b=x", "a=1, b=y", "a=1, b=z", "a=2, b=x", "a=2, b=y", "a=2, b=z",
        ]
    );
}

#[test]
fn empty_grid_runs_once_with_no_overrides() {
    let g = ParamGrid::new();
    let combos = g.combinations();
    assert_eq!(combos.len(), 1);
    assert!(combos[0].is_empty());
}

#[test]
fn empty_value_list_yields_nothing() {
    let mut g = ParamGrid::new();
    g.push("a", vec![ParamValue::Number(1.0)]).unwrap();
    g.push("b", Vec::new()).unwrap();
    assert!(g.combinations().is_empty());
}

#[test]
fn values_parse_as_numbers_when_possible() {
    let (name, values) = parse_spec(" k_on = 0.1, 1e3 ,fast").unwrap();
    assert_eq!(name, "k_on");
    assert_eq!(
        values,
        vec![
            ParamValue::Number(0.1),
            ParamValue::Number(1000.0),
            ParamValue::Text("fast".to_string())
        ]
    );
}

#[test]
fn malformed_specs_are_rejected() {
    assert!(matches!(parse_spec("k_on"), Err(SweepError::InvalidSpec(_))));
    assert!(matches!(parse_spec("=1,2"), Err(SweepError::InvalidSpec(_))));
    assert!(matches!(parse_spec("k_on="), Err(SweepError::InvalidSpec(_))));
    let mut g = grid(&["a=1"]);
    assert!(g.push_spec("a=2").is_err());
}

#[test]
fn unknown_names_fail_before_any_run() {
    let g = grid(&["k_on=1,2", "typo=3"]);
    let known = vec!["k_on".to_string(), "k_off".to_string()];
    assert_eq!(
        validate_overrides(&g, &known).unwrap_err(),
        SweepError::UnknownParameters(vec!["typo".to_string()])
    );
    let mut runner = Recorder::default();
    assert!(run_sweep(&g, &mut runner, Some(known.as_slice())).is_err());
    assert!(runner.seen.is_empty());
}

#[test]
fn failing_run_stops_the_sweep() {
    let g = grid(&["a=1,2,3"]);
    let mut runner = Recorder {
        fail_at: Some(1),
        ..Recorder::default()
    };
    let err = run_sweep(&g, &mut runner, None).unwrap_err();
    assert_eq!(runner.seen, vec!["a=1"]);
    assert!(format!("{err:#}").contains("sweep run 2/3"));
}

#[test]
fn command_args_substitute_params_path() {
    let runner = CommandRunner::new(
        "model",
        vec!["--params".to_string(), "{params}".to_string()],
        std::path::PathBuf::from("work"),
    );
    let mut overrides = ParamRecord::new();
    overrides.insert("k_on", ParamValue::Number(2.0));
    let args = runner.build_args(&overrides, "work/sweep_0001_parameters.csv");
    assert_eq!(
        args,
        vec!["--params", "work/sweep_0001_parameters.csv", "k_on=2"]
    );
    assert!(runner.params_path(1).ends_with("sweep_0001_parameters.csv"));
}

#[cfg(unix)]
#[test]
fn command_runner_finds_params_file_from_relative_work_dir() {
    // A relative work dir, created under the test's current directory.
    let tmp = tempfile::Builder::new()
        .prefix("sweep_wd")
        .tempdir_in(".")
        .unwrap();
    assert!(tmp.path().is_relative());

    let mut runner = CommandRunner::new(
        "sh",
        vec![
            "-c".to_string(),
            "grep -q k_on \"$0\" || exit 3".to_string(),
            "{params}".to_string(),
        ],
        tmp.path().to_path_buf(),
    );
    let g = grid(&["k_on=1,2"]);
    let n = run_sweep(&g, &mut runner, None).unwrap();
    assert_eq!(n, 2);
    assert!(tmp.path().join("sweep_0001_parameters.csv").exists());
    assert!(tmp.path().join("sweep_0002_parameters.csv").exists());
}

#[cfg(unix)]
#[test]
fn command_runner_reports_nonzero_exit() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut runner = CommandRunner::new(
        "sh",
        vec!["-c".to_string(), "exit 4".to_string()],
        tmp.path().to_path_buf(),
    );
    let err = run_sweep(&grid(&["a=1"]), &mut runner, None).unwrap_err();
    assert!(format!("{err:#}").contains("sweep run 1/1"));
}

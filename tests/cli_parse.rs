use std::path::PathBuf;

use clap::Parser;
use gdat_tools::cli::{Cli, Commands, StyleArg, parse_group};
use gdat_tools::extract::StatMode;

#[test]
fn groups_keep_flag_order() {
    let cli = Cli::parse_from([
        "gdat-tools",
        "anova",
        "--group",
        "wt=data/wt",
        "--group",
        "ko=data/ko",
        "--variable",
        "A_total",
        "--stat",
        "range[10:20]",
    ]);
    match cli.command {
        Commands::Anova(args) => {
            let names: Vec<&str> = args.group.iter().map(|g| g.name.as_str()).collect();
            assert_eq!(names, vec!["wt", "ko"]);
            assert_eq!(args.group[1].root, PathBuf::from("data/ko"));
            assert_eq!(args.stat, StatMode::Range { start: 10, end: 20 });
            assert!(!args.no_plot);
        }
        _ => panic!("expected anova command"),
    }
}

#[test]
fn stat_defaults_to_last() {
    let cli = Cli::parse_from([
        "gdat-tools",
        "ttest",
        "--group",
        "a=x",
        "--group",
        "b=y",
        "--variable",
        "V",
        "--welch",
    ]);
    match cli.command {
        Commands::Ttest(args) => {
            assert_eq!(args.common.stat, StatMode::Last);
            assert!(args.welch);
        }
        _ => panic!("expected ttest command"),
    }
}

#[test]
fn bad_stat_is_rejected() {
    let res = Cli::try_parse_from([
        "gdat-tools",
        "normality",
        "--group",
        "a=x",
        "--variable",
        "V",
        "--stat",
        "range",
    ]);
    assert!(res.is_err());
}

#[test]
fn traces_lists_are_comma_separated() {
    let cli = Cli::parse_from([
        "gdat-tools",
        "traces",
        "--input",
        "runs",
        "--variables",
        "A,B",
        "--params",
        "k_on",
        "--color-by",
        "k_on",
        "--color-thresholds",
        "2e4,2e3,2e2",
        "--style",
        "step",
    ]);
    match cli.command {
        Commands::Traces(args) => {
            assert_eq!(args.variables, vec!["A", "B"]);
            assert_eq!(args.params, vec!["k_on"]);
            assert_eq!(args.color_thresholds, vec![2e4, 2e3, 2e2]);
            assert_eq!(args.style, StyleArg::Step);
            assert_eq!(args.out, None);
        }
        _ => panic!("expected traces command"),
    }
}

#[test]
fn sweep_takes_trailing_command() {
    let cli = Cli::parse_from([
        "gdat-tools",
        "sweep",
        "--param",
        "k_on=1,2",
        "--param",
        "k_off=3",
        "--",
        "model",
        "--params",
        "{params}",
    ]);
    match cli.command {
        Commands::Sweep(args) => {
            assert_eq!(args.param, vec!["k_on=1,2", "k_off=3"]);
            assert_eq!(args.command, vec!["model", "--params", "{params}"]);
            assert!(!args.dry_run);
        }
        _ => panic!("expected sweep command"),
    }
}

#[test]
fn group_flag_parsing() {
    let g = parse_group("wt = data/wt").unwrap();
    assert_eq!(g.name, "wt");
    assert_eq!(g.root, PathBuf::from("data/wt"));
    assert_eq!(parse_group("data/ko").unwrap().name, "ko");
    assert!(parse_group("=data").is_err());
}

#[test]
fn overview_kd_takes_two_parameter_names() {
    let cli = Cli::parse_from([
        "gdat-tools",
        "overview",
        "--base",
        "runs",
        "--variable",
        "A",
        "--out",
        "overview.csv",
        "--kd",
        "kon_camkii,koff_camkii",
    ]);
    match cli.command {
        Commands::Overview(args) => {
            let kd = args.kd.unwrap();
            assert_eq!(kd.kon, "kon_camkii");
            assert_eq!(kd.koff, "koff_camkii");
        }
        _ => panic!("expected overview command"),
    }
    assert!(
        Cli::try_parse_from([
            "gdat-tools", "overview", "--base", "runs", "--variable", "A", "--out", "o.csv",
            "--kd", "kon",
        ])
        .is_err()
    );
}

#[test]
fn trace_style_defaults_to_line() {
    let cli = Cli::parse_from(["gdat-tools", "traces", "--input", "runs"]);
    match cli.command {
        Commands::Traces(args) => assert_eq!(args.style, StyleArg::Line),
        _ => panic!("expected traces command"),
    }
    assert!(Cli::try_parse_from(["gdat-tools", "traces", "--input", "runs", "--style", "dots"]).is_err());
}

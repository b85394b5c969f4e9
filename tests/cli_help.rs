use assert_cmd::Command;

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("gdat-tools").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn subcommand_help_smoke() {
    for sub in ["traces", "mean", "compare", "normality", "anova", "ttest", "sweep"] {
        let mut cmd = Command::cargo_bin("gdat-tools").unwrap();
        cmd.args([sub, "--help"]);
        cmd.assert().success();
    }
}

#[test]
fn concentration_prints_micromolar() {
    let mut cmd = Command::cargo_bin("gdat-tools").unwrap();
    cmd.args(["concentration", "--molecules", "1024"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("= 100.0088 µM"), "{text}");
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::ctx::GroupSpec;
use crate::extract::StatMode;
use crate::overview::KdColumns;

#[derive(Debug, Parser)]
#[command(
    name = "gdat-tools",
    version,
    about = "Post-processing for .gdat simulation time series"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plot every run's time series
    Traces(TracesArgs),
    /// Plot mean ± std traces over all runs of a folder
    Mean(MeanArgs),
    /// Plot mean ± std traces of several groups on one chart
    Compare(CompareArgs),
    /// Shapiro-Wilk test per group
    Normality(GroupStatArgs),
    /// One-way ANOVA with Tukey HSD post-hoc
    Anova(GroupStatArgs),
    /// Two-sample t-test (Mann-Whitney U on zero variance)
    Ttest(TtestArgs),
    /// One CSV row per run: metadata, parameters and a statistic
    Overview(OverviewArgs),
    /// Render a CSV as a Markdown table
    Markdown(MarkdownArgs),
    /// Run a model once per combination of parameter values
    Sweep(SweepArgs),
    /// Convert a molecule count to micromolar
    Concentration(ConcentrationArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Line,
    Step,
}

#[derive(Debug, Args)]
pub struct TracesArgs {
    #[arg(long, help = "Folder searched recursively for .gdat files")]
    pub input: PathBuf,

    #[arg(long, value_delimiter = ',', help = "Variables to plot (default: all)")]
    pub variables: Vec<String>,

    #[arg(long, value_delimiter = ',', help = "Parameters shown in the legend")]
    pub params: Vec<String>,

    #[arg(long, help = "Colour runs by this parameter")]
    pub color_by: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        requires = "color_by",
        help = "Descending thresholds for --color-by (default: continuous colour map)"
    )]
    pub color_thresholds: Vec<f64>,

    #[arg(long, value_enum, default_value_t = StyleArg::Line)]
    pub style: StyleArg,

    #[arg(long, help = "Variable colour TSV overlaid on the built-in palette")]
    pub colors: Option<PathBuf>,

    #[arg(long, help = "Output folder (default: the input folder)")]
    pub out: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct MeanArgs {
    #[arg(long, help = "Folder searched recursively for .gdat files")]
    pub input: PathBuf,

    #[arg(long, value_delimiter = ',', help = "Variables to average (default: all)")]
    pub variables: Vec<String>,

    #[arg(long, help = "Variable colour TSV overlaid on the built-in palette")]
    pub colors: Option<PathBuf>,

    #[arg(long, help = "Output folder (default: the input folder)")]
    pub out: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[arg(long, required = true, value_parser = parse_group, help = "NAME=DIR (repeatable)")]
    pub group: Vec<GroupSpec>,

    #[arg(long, value_delimiter = ',', help = "Variables to average (default: all)")]
    pub variables: Vec<String>,

    #[arg(long, help = "Output folder", default_value = ".")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}

#[derive(Debug, Args)]
pub struct GroupStatArgs {
    #[arg(long, required = true, value_parser = parse_group, help = "NAME=DIR (repeatable)")]
    pub group: Vec<GroupSpec>,

    #[arg(long)]
    pub variable: String,

    #[arg(long, default_value = "last", help = "first | last | range[START:END]")]
    pub stat: StatMode,

    #[arg(long, help = "Output folder", default_value = ".")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}

#[derive(Debug, Args)]
pub struct TtestArgs {
    #[command(flatten)]
    pub common: GroupStatArgs,

    #[arg(long, default_value_t = false, help = "Welch's t-test (unequal variances)")]
    pub welch: bool,
}

#[derive(Debug, Args)]
pub struct OverviewArgs {
    #[arg(long, help = "Folder whose sub-folders are runs")]
    pub base: PathBuf,

    #[arg(long)]
    pub variable: String,

    #[arg(long, default_value = "last", help = "first | last | range[START:END]")]
    pub stat: StatMode,

    #[arg(long, help = "Overview CSV to write")]
    pub out: PathBuf,

    #[arg(long, help = "Also render the overview as a Markdown table")]
    pub markdown: Option<PathBuf>,

    #[arg(long, value_name = "KON,KOFF", help = "Append kd = KOFF / KON from these parameters")]
    pub kd: Option<KdColumns>,
}

#[derive(Debug, Args)]
pub struct MarkdownArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value_t = false, help = "Treat the input as a parameter file")]
    pub params: bool,

    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct SweepArgs {
    #[arg(long, help = "NAME=v1,v2,... (repeatable, first varies slowest)")]
    pub param: Vec<String>,

    #[arg(long, help = "Model parameter CSV; override names must appear in it")]
    pub known_params: Option<PathBuf>,

    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    #[arg(long, default_value_t = false, help = "List combinations without running")]
    pub dry_run: bool,

    #[arg(last = true, help = "Model command; {params} is replaced with the override CSV")]
    pub command: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConcentrationArgs {
    #[arg(long)]
    pub molecules: f64,

    #[arg(long, default_value_t = crate::units::DEFAULT_VOLUME_UM3)]
    pub volume_um3: f64,
}

/// `NAME=DIR`; a bare `DIR` is named after its last path component.
pub fn parse_group(raw: &str) -> Result<GroupSpec, String> {
    let (name, root) = match raw.split_once('=') {
        Some((name, root)) => (name.trim().to_string(), PathBuf::from(root.trim())),
        None => {
            let root = PathBuf::from(raw.trim());
            let name = root
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            (name, root)
        }
    };
    if name.is_empty() || root.as_os_str().is_empty() {
        return Err(format!("expected NAME=DIR, got '{}'", raw));
    }
    Ok(GroupSpec { name, root })
}

use std::path::PathBuf;

use crate::extract::StatMode;
use crate::hypothesis::GroupValues;
use crate::hypothesis::anova::AnovaResult;
use crate::hypothesis::shapiro::ShapiroResult;
use crate::hypothesis::two_sample::TwoSampleResult;
use crate::input::RunFiles;
use crate::io::gdat::GdatTable;
use crate::io::params::ParamRecord;
use crate::plot::compare::GroupMeans;
use crate::plot::palette::Palette;
use crate::plot::traces::{ColorBy, TraceStyle};
use crate::schema::v1::{Analysis, AnalysisReportV1};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoadedRun {
    pub group: usize,
    pub files: RunFiles,
    pub table: GdatTable,
    pub params: Option<ParamRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunValue {
    pub group: String,
    pub run: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct TraceOptions {
    pub title: String,
    pub style: TraceStyle,
    pub color_by: ColorBy,
    pub legend_params: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub summary_path: PathBuf,
    pub plot_path: Option<PathBuf>,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf, analysis: Analysis) -> Self {
        let plot_name = match analysis {
            Analysis::Traces => Some("all_variables_plot.png"),
            Analysis::Mean => Some("mean_variables_plot.png"),
            Analysis::Compare => Some("mean_variables_comparison.png"),
            Analysis::Normality => None,
            Analysis::Anova => Some("anova_boxplot.png"),
            Analysis::Ttest => Some("ttest_bar.png"),
        };
        Self {
            json_path: out_dir.join("report.json"),
            summary_path: out_dir.join("summary.csv"),
            plot_path: plot_name.map(|name| out_dir.join(name)),
            out_dir,
        }
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub analysis: Analysis,
    pub groups: Vec<GroupSpec>,
    pub variables: Vec<String>,
    pub stat: StatMode,
    pub palette: Palette,
    pub traces: TraceOptions,
    pub welch: bool,
    pub plot: bool,
    pub write_json: bool,
    pub discovered: Vec<(usize, RunFiles)>,
    pub runs: Vec<LoadedRun>,
    pub run_values: Vec<RunValue>,
    pub group_values: Vec<GroupValues>,
    pub means: Vec<GroupMeans>,
    pub normality: Vec<ShapiroResult>,
    pub anova: Option<AnovaResult>,
    pub two_sample: Option<TwoSampleResult>,
    pub warnings: Vec<String>,
    pub plot_written: Option<PathBuf>,
    pub output: OutputPaths,
    pub report: AnalysisReportV1,
    pub tool_version: String,
}

impl Ctx {
    pub fn new(
        analysis: Analysis,
        groups: Vec<GroupSpec>,
        out_dir: PathBuf,
        palette: Palette,
        tool_version: &str,
    ) -> Self {
        Self {
            output: OutputPaths::new(out_dir, analysis),
            report: AnalysisReportV1::empty(tool_version, analysis),
            analysis,
            groups,
            variables: Vec::new(),
            stat: StatMode::Last,
            palette,
            traces: TraceOptions::default(),
            welch: false,
            plot: true,
            write_json: false,
            discovered: Vec::new(),
            runs: Vec::new(),
            run_values: Vec::new(),
            group_values: Vec::new(),
            means: Vec::new(),
            normality: Vec::new(),
            anova: None,
            two_sample: None,
            warnings: Vec::new(),
            plot_written: None,
            tool_version: tool_version.to_string(),
        }
    }

    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn runs_of(&self, group: usize) -> impl Iterator<Item = &LoadedRun> {
        self.runs.iter().filter(move |r| r.group == group)
    }

    /// Selected variables, or every variable of the first loaded run when
    /// none were selected.
    pub fn effective_variables(&self) -> Vec<String> {
        if !self.variables.is_empty() {
            return self.variables.clone();
        }
        self.runs
            .first()
            .map(|r| r.table.names().to_vec())
            .unwrap_or_default()
    }
}

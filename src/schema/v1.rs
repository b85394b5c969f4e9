use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis {
    Traces,
    Mean,
    Compare,
    Normality,
    Anova,
    Ttest,
}

impl Analysis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traces => "traces",
            Self::Mean => "mean",
            Self::Compare => "compare",
            Self::Normality => "normality",
            Self::Anova => "anova",
            Self::Ttest => "ttest",
        }
    }

    pub fn uses_statistic(&self) -> bool {
        matches!(self, Self::Normality | Self::Anova | Self::Ttest)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    pub root: String,
    pub runs: u64,
    pub n_values: u64,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub sem: Option<f64>,
    pub median: Option<f64>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalityEntry {
    pub group: String,
    pub n: u64,
    pub w: f64,
    pub p_value: f64,
    pub normal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TukeyEntry {
    pub group1: String,
    pub group2: String,
    pub mean_diff: f64,
    pub q: Option<f64>,
    pub p_adj: f64,
    pub reject: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaEntry {
    /// `None` when the within-group variance is zero (infinite F).
    pub f_statistic: Option<f64>,
    pub p_value: f64,
    pub df_between: f64,
    pub df_within: f64,
    pub significant: bool,
    pub tukey: Option<Vec<TukeyEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoSampleEntry {
    pub test: String,
    pub group1: String,
    pub group2: String,
    pub statistic: f64,
    pub df: Option<f64>,
    pub p_value: f64,
    pub significant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalValue {
    pub group: Option<String>,
    pub variable: String,
    pub mean: f64,
    pub std: f64,
    pub n_series: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub analysis: Analysis,
    pub variables: Vec<String>,
    pub statistic: Option<String>,
    pub groups: Vec<GroupSummary>,
    pub normality: Vec<NormalityEntry>,
    pub anova: Option<AnovaEntry>,
    pub two_sample: Option<TwoSampleEntry>,
    pub final_values: Vec<FinalValue>,
    pub plot_path: Option<String>,
    pub warnings: Vec<String>,
}

impl AnalysisReportV1 {
    pub fn empty(tool_version: &str, analysis: Analysis) -> Self {
        Self {
            tool: "gdat-tools".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            analysis,
            variables: Vec::new(),
            statistic: None,
            groups: Vec::new(),
            normality: Vec::new(),
            anova: None,
            two_sample: None,
            final_values: Vec::new(),
            plot_path: None,
            warnings: Vec::new(),
        }
    }
}

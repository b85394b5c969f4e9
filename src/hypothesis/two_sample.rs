use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::StatsError;
use crate::hypothesis::mann_whitney::mann_whitney_u;
use crate::hypothesis::{require_samples, GroupValues, ALPHA, MIN_SAMPLES};
use crate::math::stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TwoSampleTest {
    StudentT,
    WelchT,
    MannWhitneyU,
}

impl TwoSampleTest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::StudentT => "Student t-test",
            Self::WelchT => "Welch t-test",
            Self::MannWhitneyU => "Mann-Whitney U",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TwoSampleResult {
    pub test: TwoSampleTest,
    pub group1: String,
    pub group2: String,
    pub statistic: f64,
    pub df: Option<f64>,
    pub p_value: f64,
    pub significant: bool,
}

/// Falls back to Mann-Whitney U when either sample has zero variance.
pub fn compare_two(
    a: &GroupValues,
    b: &GroupValues,
    welch: bool,
) -> Result<TwoSampleResult, StatsError> {
    require_samples(&[a.clone(), b.clone()], MIN_SAMPLES)?;

    let (test, statistic, df, p_value) =
        if stats::is_constant(&a.values) || stats::is_constant(&b.values) {
            let mw = mann_whitney_u(&a.values, &b.values);
            (TwoSampleTest::MannWhitneyU, mw.u, None, mw.p_value)
        } else if welch {
            let (t, df, p) = welch_t(&a.values, &b.values)?;
            (TwoSampleTest::WelchT, t, Some(df), p)
        } else {
            let (t, df, p) = student_t(&a.values, &b.values)?;
            (TwoSampleTest::StudentT, t, Some(df), p)
        };

    Ok(TwoSampleResult {
        test,
        group1: a.name.clone(),
        group2: b.name.clone(),
        statistic,
        df,
        p_value,
        significant: p_value < ALPHA,
    })
}

pub fn student_t(a: &[f64], b: &[f64]) -> Result<(f64, f64, f64), StatsError> {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let df = n1 + n2 - 2.0;
    let pooled = ((n1 - 1.0) * stats::sample_variance(a) + (n2 - 1.0) * stats::sample_variance(b))
        / df;
    let se = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    let t = (stats::mean(a) - stats::mean(b)) / se;
    Ok((t, df, two_sided_t(t, df)?))
}

pub fn welch_t(a: &[f64], b: &[f64]) -> Result<(f64, f64, f64), StatsError> {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let se1 = stats::sample_variance(a) / n1;
    let se2 = stats::sample_variance(b) / n2;
    let t = (stats::mean(a) - stats::mean(b)) / (se1 + se2).sqrt();
    let df = (se1 + se2).powi(2) / (se1.powi(2) / (n1 - 1.0) + se2.powi(2) / (n2 - 1.0));
    Ok((t, df, two_sided_t(t, df)?))
}

fn two_sided_t(t: f64, df: f64) -> Result<f64, StatsError> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Degenerate(e.to_string()))?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

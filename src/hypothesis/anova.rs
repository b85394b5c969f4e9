use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::error::StatsError;
use crate::hypothesis::tukey::{tukey_hsd, TukeyPair};
use crate::hypothesis::{require_groups, require_samples, GroupValues, ALPHA, MIN_SAMPLES};
use crate::math::stats;

#[derive(Debug, Clone, Serialize)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    pub df_between: f64,
    pub df_within: f64,
    pub significant: bool,
    /// Present only when the omnibus test is significant.
    pub tukey: Option<Vec<TukeyPair>>,
}

pub fn one_way_anova(groups: &[GroupValues]) -> Result<AnovaResult, StatsError> {
    require_groups(groups, 2)?;
    require_samples(groups, MIN_SAMPLES)?;

    let k = groups.len();
    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let all: Vec<f64> = groups.iter().flat_map(|g| g.values.iter().copied()).collect();
    let grand_mean = stats::mean(&all);

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in groups {
        let m = stats::mean(&g.values);
        ss_between += g.len() as f64 * (m - grand_mean).powi(2);
        ss_within += g.values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    }
    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;

    let (f_statistic, p_value) = if ss_within > 0.0 {
        let f = (ss_between / df_between) / (ss_within / df_within);
        let dist = FisherSnedecor::new(df_between, df_within)
            .map_err(|e| StatsError::Degenerate(e.to_string()))?;
        (f, dist.sf(f))
    } else if ss_between > 0.0 {
        (f64::INFINITY, 0.0)
    } else {
        return Err(StatsError::Degenerate(
            "all values are identical across groups".to_string(),
        ));
    };

    let significant = p_value < ALPHA;
    let tukey = significant.then(|| tukey_hsd(groups));

    Ok(AnovaResult {
        f_statistic,
        p_value,
        df_between,
        df_within,
        significant,
        tukey,
    })
}

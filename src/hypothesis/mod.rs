pub mod anova;
pub mod mann_whitney;
pub mod shapiro;
pub mod tukey;
pub mod two_sample;

use serde::Serialize;

use crate::error::StatsError;

pub const MIN_SAMPLES: usize = 3;
pub const ALPHA: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupValues {
    pub name: String,
    pub values: Vec<f64>,
}

impl GroupValues {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.values.windows(2).all(|w| w[0] == w[1])
    }
}

pub fn require_samples(groups: &[GroupValues], needed: usize) -> Result<(), StatsError> {
    for g in groups {
        if g.values.len() < needed {
            return Err(StatsError::InsufficientSamples {
                group: g.name.clone(),
                found: g.values.len(),
                needed,
            });
        }
    }
    Ok(())
}

pub fn require_groups(groups: &[GroupValues], needed: usize) -> Result<(), StatsError> {
    if groups.len() < needed {
        return Err(StatsError::InsufficientGroups {
            found: groups.len(),
            needed,
        });
    }
    Ok(())
}

pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * statrs::function::erf::erfc(-x / std::f64::consts::SQRT_2)
}

pub(crate) fn norm_sf(x: f64) -> f64 {
    0.5 * statrs::function::erf::erfc(x / std::f64::consts::SQRT_2)
}

pub(crate) fn norm_ppf(p: f64) -> f64 {
    -std::f64::consts::SQRT_2 * statrs::function::erf::erfc_inv(2.0 * p)
}

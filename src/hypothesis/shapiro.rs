//! Shapiro-Wilk W test using Royston's (1995) approximation for the
//! coefficients and the p-value (algorithm AS R94).

use serde::Serialize;

use crate::error::StatsError;
use crate::hypothesis::{norm_ppf, norm_sf, GroupValues, ALPHA, MIN_SAMPLES};

const MAX_SAMPLES: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

#[derive(Debug, Clone, Serialize)]
pub struct ShapiroResult {
    pub group: String,
    pub n: usize,
    pub w: f64,
    pub p_value: f64,
    pub normal: bool,
}

pub fn shapiro_group(group: &GroupValues) -> Result<ShapiroResult, StatsError> {
    let (w, p_value) = shapiro_wilk(&group.values).map_err(|e| match e {
        StatsError::InsufficientSamples { found, needed, .. } => StatsError::InsufficientSamples {
            group: group.name.clone(),
            found,
            needed,
        },
        other => other,
    })?;
    Ok(ShapiroResult {
        group: group.name.clone(),
        n: group.values.len(),
        w,
        p_value,
        normal: p_value > ALPHA,
    })
}

pub fn shapiro_wilk(values: &[f64]) -> Result<(f64, f64), StatsError> {
    let n = values.len();
    if n < MIN_SAMPLES {
        return Err(StatsError::InsufficientSamples {
            group: String::new(),
            found: n,
            needed: MIN_SAMPLES,
        });
    }
    if n > MAX_SAMPLES {
        return Err(StatsError::Degenerate(format!(
            "Shapiro-Wilk supports at most {} values, got {}",
            MAX_SAMPLES, n
        )));
    }

    let mut x = values.to_vec();
    x.sort_by(f64::total_cmp);
    let range = x[n - 1] - x[0];
    // Zero range: W is undefined; report it as perfectly normal like scipy.
    if range <= 0.0 {
        return Ok((1.0, 1.0));
    }

    let a = coefficients(n);
    let half = n / 2;
    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let mut num = 0.0;
    for i in 0..half {
        num += a[i] * (x[n - 1 - i] - x[i]);
    }
    let w = (num * num / ss).min(1.0);

    Ok((w, p_value(w, n)))
}

/// The first n/2 coefficients, largest first; the rest follow by antisymmetry.
fn coefficients(n: usize) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }
    let an25 = n as f64 + 0.25;
    let mut m: Vec<f64> = (1..=half)
        .map(|i| norm_ppf((i as f64 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;

    let (first_scaled, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        m[1] = a2;
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        (1, fac)
    };
    m[0] = a1;
    for v in m.iter_mut().skip(first_scaled) {
        *v /= -fac;
    }
    m
}

fn p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        const SIX_OVER_PI: f64 = 1.909_859_317_102_744;
        const ASIN_SQRT_3_4: f64 = 1.047_197_551_196_598;
        return (SIX_OVER_PI * (w.sqrt().asin() - ASIN_SQRT_3_4)).clamp(0.0, 1.0);
    }

    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let mut y = w1.ln();
    let an = n as f64;
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };
    norm_sf((y - m) / s)
}

fn poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

//! Two-sided Mann-Whitney U test.
//!
//! Small tie-free samples use the exact null distribution of U; everything
//! else uses the normal approximation with tie and continuity corrections.

use crate::hypothesis::norm_sf;

const EXACT_MAX_N: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitney {
    pub u: f64,
    pub p_value: f64,
    pub exact: bool,
}

pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> MannWhitney {
    let n1 = x.len();
    let n2 = y.len();
    let (ranks, tie_sizes) = rank_with_ties(x, y);
    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u_max = u1.max(u2);

    let has_ties = tie_sizes.iter().any(|&t| t > 1);
    if !has_ties && n1.max(n2) <= EXACT_MAX_N {
        let p = 2.0 * exact_sf(u_max.round() as usize, n1, n2);
        return MannWhitney {
            u: u1,
            p_value: p.min(1.0),
            exact: true,
        };
    }

    let n = (n1 + n2) as f64;
    let tie_term: f64 = tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum::<f64>()
        / (n * (n - 1.0));
    let mu = (n1 * n2) as f64 / 2.0;
    let sigma = ((n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term)).sqrt();
    let p_value = if sigma > 0.0 {
        let z = (u_max - mu - 0.5) / sigma;
        (2.0 * norm_sf(z)).min(1.0)
    } else {
        1.0
    };
    MannWhitney {
        u: u1,
        p_value,
        exact: false,
    }
}

fn rank_with_ties(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let mut order: Vec<usize> = (0..pooled.len()).collect();
    order.sort_by(|&a, &b| pooled[a].total_cmp(&pooled[b]));

    let mut ranks = vec![0.0; pooled.len()];
    let mut tie_sizes = Vec::new();
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && pooled[order[j]] == pooled[order[i]] {
            j += 1;
        }
        let avg = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        tie_sizes.push(j - i);
        i = j;
    }
    (ranks, tie_sizes)
}

/// P(U >= u) under the null for sample sizes `m`, `n`.
fn exact_sf(u: usize, m: usize, n: usize) -> f64 {
    let max_u = m * n;
    if u > max_u {
        return 0.0;
    }
    // counts[a][b][k]: arrangements of a x-values and b y-values with U = k.
    let mut prev: Vec<Vec<f64>> = vec![vec![0.0; max_u + 1]; n + 1];
    for row in prev.iter_mut() {
        row[0] = 1.0;
    }
    for _a in 1..=m {
        let mut cur: Vec<Vec<f64>> = vec![vec![0.0; max_u + 1]; n + 1];
        cur[0][0] = 1.0;
        for b in 1..=n {
            for k in 0..=max_u {
                let from_x = if k >= b { prev[b][k - b] } else { 0.0 };
                cur[b][k] = from_x + cur[b - 1][k];
            }
        }
        prev = cur;
    }
    let dist = &prev[n];
    let total: f64 = dist.iter().sum();
    dist[u..].iter().sum::<f64>() / total
}

//! Studentized range distribution and the Tukey HSD post-hoc comparison.
//!
//! The CDF follows Copenhaver & Holland (1988): Gauss-Legendre quadrature
//! over the range density, then over the chi distribution of the pooled
//! standard deviation.

use serde::Serialize;
use statrs::function::gamma::ln_gamma;

use crate::hypothesis::{norm_cdf, GroupValues, ALPHA};
use crate::math::stats;

const XLEG: [f64; 6] = [
    0.981_560_634_246_719_3,
    0.904_117_256_370_474_9,
    0.769_902_674_194_304_7,
    0.587_317_954_286_617_4,
    0.367_831_498_998_180_2,
    0.125_233_408_511_468_9,
];
const ALEG: [f64; 6] = [
    0.047_175_336_386_511_83,
    0.106_939_325_995_318_4,
    0.160_078_328_543_346_2,
    0.203_167_426_723_065_9,
    0.233_492_536_538_354_8,
    0.249_147_045_813_402_8,
];
const XLEGQ: [f64; 8] = [
    0.989_400_934_991_649_9,
    0.944_575_023_073_232_6,
    0.865_631_202_387_831_7,
    0.755_404_408_355_003,
    0.617_876_244_402_643_7,
    0.458_016_777_657_227_4,
    0.281_603_550_779_258_9,
    0.095_012_509_837_637_44,
];
const ALEGQ: [f64; 8] = [
    0.027_152_459_411_754_09,
    0.062_253_523_938_647_89,
    0.095_158_511_682_492_78,
    0.124_628_971_255_533_9,
    0.149_595_988_816_576_7,
    0.169_156_519_395_002_5,
    0.182_603_415_044_923_6,
    0.189_450_610_455_068_5,
];

/// Probability that the range of `cc` standard normals is below `w`,
/// raised to `rr`.
fn wprob(w: f64, rr: f64, cc: f64) -> f64 {
    const NLEG: usize = 12;
    const IHALF: usize = 6;
    const C1: f64 = -30.0;
    const C2: f64 = -50.0;
    const C3: f64 = 60.0;
    const BB: f64 = 8.0;
    const WLAR: f64 = 3.0;

    let qsqz = w * 0.5;
    if qsqz >= BB {
        return 1.0;
    }

    let mut pr_w = 2.0 * norm_cdf(qsqz) - 1.0;
    pr_w = if pr_w >= (C2 / cc).exp() {
        pr_w.powf(cc)
    } else {
        0.0
    };

    let wincr = if w > WLAR { 2.0 } else { 3.0 };
    let mut blb = qsqz;
    let binc = (BB - qsqz) / wincr;
    let mut bub = blb + binc;
    let mut einsum = 0.0;
    let cc1 = cc - 1.0;

    let mut wi = 1.0;
    while wi <= wincr {
        let mut elsum = 0.0;
        let a = 0.5 * (bub + blb);
        let b = 0.5 * (bub - blb);

        for jj in 1..=NLEG {
            let (j, xx) = if IHALF < jj {
                let j = NLEG - jj + 1;
                (j, XLEG[j - 1])
            } else {
                (jj, -XLEG[jj - 1])
            };
            let ac = a + b * xx;
            let qexpo = ac * ac;
            if qexpo > C3 {
                break;
            }
            let rinsum = norm_cdf(ac) - norm_cdf(ac - w);
            if rinsum >= (C1 / cc1).exp() {
                elsum += ALEG[j - 1] * (-(0.5 * qexpo)).exp() * rinsum.powf(cc1);
            }
        }
        elsum *= 2.0 * b * cc / (2.0 * std::f64::consts::PI).sqrt();
        einsum += elsum;
        blb = bub;
        bub += binc;
        wi += 1.0;
    }

    pr_w += einsum;
    if pr_w <= (C1 / rr).exp() {
        return 0.0;
    }
    pr_w.powf(rr).min(1.0)
}

pub fn ptukey(q: f64, groups: f64, df: f64) -> f64 {
    const NLEGQ: usize = 16;
    const IHALFQ: usize = 8;
    const EPS1: f64 = -30.0;
    const EPS2: f64 = 1.0e-14;
    const DLARG: f64 = 25000.0;
    let rr = 1.0;
    let cc = groups;

    if q.is_nan() || df < 2.0 || cc < 2.0 {
        return f64::NAN;
    }
    if q <= 0.0 {
        return 0.0;
    }
    if q.is_infinite() {
        return 1.0;
    }
    if df > DLARG {
        return wprob(q, rr, cc);
    }

    let f2 = df * 0.5;
    let mut f2lf = (f2 * df.ln()) - (df * std::f64::consts::LN_2) - ln_gamma(f2);
    let f21 = f2 - 1.0;
    let ff4 = df * 0.25;
    let ulen: f64 = if df <= 100.0 {
        1.0
    } else if df <= 800.0 {
        0.5
    } else if df <= 5000.0 {
        0.25
    } else {
        0.125
    };
    f2lf += ulen.ln();

    let mut ans = 0.0;
    for i in 1..=50 {
        let mut otsum = 0.0;
        let twa1 = (2 * i - 1) as f64 * ulen;

        for jj in 1..=NLEGQ {
            let (j, upper) = if IHALFQ < jj {
                (jj - IHALFQ - 1, true)
            } else {
                (jj - 1, false)
            };
            let off = XLEGQ[j] * ulen;
            let t1 = if upper {
                f2lf + f21 * (twa1 + off).ln() - (off + twa1) * ff4
            } else {
                f2lf + f21 * (twa1 - off).ln() + (off - twa1) * ff4
            };
            if t1 >= EPS1 {
                let qsqz = if upper {
                    q * ((off + twa1) * 0.5).sqrt()
                } else {
                    q * ((twa1 - off) * 0.5).sqrt()
                };
                otsum += wprob(qsqz, rr, cc) * ALEGQ[j] * t1.exp();
            }
        }

        if i as f64 * ulen >= 1.0 && otsum <= EPS2 {
            break;
        }
        ans += otsum;
    }

    ans.min(1.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct TukeyPair {
    pub group1: String,
    pub group2: String,
    pub mean_diff: f64,
    pub q: f64,
    pub p_adj: f64,
    pub reject: bool,
}

pub fn tukey_hsd(groups: &[GroupValues]) -> Vec<TukeyPair> {
    let k = groups.len();
    let n_total: usize = groups.iter().map(|g| g.values.len()).sum();
    let df = (n_total - k.min(n_total)) as f64;
    let ssw: f64 = groups
        .iter()
        .map(|g| {
            let m = stats::mean(&g.values);
            g.values.iter().map(|v| (v - m).powi(2)).sum::<f64>()
        })
        .sum();
    let mse = if df > 0.0 { ssw / df } else { f64::NAN };

    let mut pairs = Vec::new();
    for i in 0..k {
        for j in (i + 1)..k {
            let a = &groups[i];
            let b = &groups[j];
            let diff = stats::mean(&b.values) - stats::mean(&a.values);
            let se = (mse * 0.5 * (1.0 / a.len() as f64 + 1.0 / b.len() as f64)).sqrt();
            let (q, p_adj) = if se > 0.0 {
                let q = diff.abs() / se;
                (q, (1.0 - ptukey(q, k as f64, df)).clamp(0.0, 1.0))
            } else if diff == 0.0 {
                (0.0, 1.0)
            } else {
                (f64::INFINITY, 0.0)
            };
            pairs.push(TukeyPair {
                group1: a.name.clone(),
                group2: b.name.clone(),
                mean_diff: diff,
                q,
                p_adj,
                reject: p_adj < ALPHA,
            });
        }
    }
    pairs
}

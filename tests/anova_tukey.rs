use gdat_tools::error::StatsError;
use gdat_tools::hypothesis::GroupValues;
use gdat_tools::hypothesis::anova::one_way_anova;
use gdat_tools::hypothesis::tukey::{ptukey, tukey_hsd};

fn separated() -> Vec<GroupValues> {
    vec![
        GroupValues::new("low", vec![1.0, 2.0, 3.0]),
        GroupValues::new("mid", vec![4.0, 5.0, 6.0]),
        GroupValues::new("high", vec![10.0, 11.0, 12.0]),
    ]
}

#[test]
fn ptukey_matches_reference_values() {
    assert!((ptukey(3.5, 3.0, 12.0) - 0.930005).abs() < 1e-4);
    assert!((ptukey(2.0, 3.0, 6.0) - 0.607744).abs() < 1e-4);
    assert!((ptukey(4.2, 4.0, 20.0) - 0.964912).abs() < 1e-4);
    assert!((ptukey(3.0, 2.0, 10.0) - 0.940110).abs() < 1e-4);
}

#[test]
fn ptukey_edges() {
    assert_eq!(ptukey(0.0, 3.0, 10.0), 0.0);
    assert_eq!(ptukey(f64::INFINITY, 3.0, 10.0), 1.0);
    assert!(ptukey(1.0, 1.0, 10.0).is_nan());
}

#[test]
fn anova_f_and_p() {
    let r = one_way_anova(&separated()).unwrap();
    assert!((r.f_statistic - 63.0).abs() < 1e-9);
    assert_eq!(r.df_between, 2.0);
    assert_eq!(r.df_within, 6.0);
    // F(2, 6) survival has the closed form (1 + F/3)^-3.
    assert!((r.p_value - 22f64.powi(-3)).abs() < 1e-8);
    assert!(r.significant);
}

#[test]
fn significant_anova_runs_tukey() {
    let r = one_way_anova(&separated()).unwrap();
    let pairs = r.tukey.expect("post-hoc pairs");
    assert_eq!(pairs.len(), 3);
    assert_eq!((pairs[0].group1.as_str(), pairs[0].group2.as_str()), ("low", "mid"));
    assert!((pairs[0].mean_diff - 3.0).abs() < 1e-12);
    assert!((pairs[0].q - 3.0 * 3f64.sqrt()).abs() < 1e-9);
    assert!(pairs.iter().all(|p| p.reject && p.p_adj < 0.05));
}

#[test]
fn overlapping_groups_skip_tukey() {
    let groups = vec![
        GroupValues::new("a", vec![1.0, 2.0, 3.0, 4.0]),
        GroupValues::new("b", vec![1.5, 2.5, 3.5, 4.5]),
    ];
    let r = one_way_anova(&groups).unwrap();
    assert!(!r.significant);
    assert!(r.tukey.is_none());
}

#[test]
fn tukey_identical_means_are_not_rejected() {
    let groups = vec![
        GroupValues::new("a", vec![1.0, 2.0, 3.0]),
        GroupValues::new("b", vec![3.0, 2.0, 1.0]),
    ];
    let pairs = tukey_hsd(&groups);
    assert_eq!(pairs[0].q, 0.0);
    assert!(!pairs[0].reject);
}

#[test]
fn small_group_is_refused() {
    let mut groups = separated();
    groups[1].values.truncate(2);
    assert_eq!(
        one_way_anova(&groups).unwrap_err(),
        StatsError::InsufficientSamples {
            group: "mid".to_string(),
            found: 2,
            needed: 3
        }
    );
}

#[test]
fn one_group_is_refused() {
    let groups = vec![GroupValues::new("solo", vec![1.0, 2.0, 3.0])];
    assert_eq!(
        one_way_anova(&groups).unwrap_err(),
        StatsError::InsufficientGroups { found: 1, needed: 2 }
    );
}

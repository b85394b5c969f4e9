use gdat_tools::error::StatsError;
use gdat_tools::hypothesis::GroupValues;
use gdat_tools::hypothesis::shapiro::{shapiro_group, shapiro_wilk};

#[test]
fn skewed_sample_is_not_normal() {
    let v = [
        148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0,
    ];
    let (w, p) = shapiro_wilk(&v).unwrap();
    assert!((w - 0.78881).abs() < 1e-4, "w = {w}");
    assert!((p - 0.006704).abs() < 1e-4, "p = {p}");
}

#[test]
fn three_values_use_exact_p() {
    let (w, p) = shapiro_wilk(&[1.0, 2.0, 4.0]).unwrap();
    assert!((w - 0.964286).abs() < 1e-5, "w = {w}");
    assert!((p - 0.636887).abs() < 1e-4, "p = {p}");

    let (w, p) = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
    assert!((w - 1.0).abs() < 1e-9);
    assert!(p > 0.99);
}

#[test]
fn order_of_input_is_irrelevant() {
    let a = shapiro_wilk(&[5.0, 1.0, 3.0, 2.0, 8.0, 4.0]).unwrap();
    let b = shapiro_wilk(&[1.0, 2.0, 3.0, 4.0, 5.0, 8.0]).unwrap();
    assert!((a.0 - b.0).abs() < 1e-12);
    assert!((a.1 - b.1).abs() < 1e-12);
}

#[test]
fn verdict_uses_five_percent() {
    let g = GroupValues::new("wt", vec![10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 10.0, 12.0]);
    let r = shapiro_group(&g).unwrap();
    assert_eq!(r.group, "wt");
    assert_eq!(r.n, 8);
    assert_eq!(r.normal, r.p_value > 0.05);
}

#[test]
fn fewer_than_three_values_are_refused() {
    let g = GroupValues::new("ko", vec![1.0, 2.0]);
    assert_eq!(
        shapiro_group(&g).unwrap_err(),
        StatsError::InsufficientSamples {
            group: "ko".to_string(),
            found: 2,
            needed: 3
        }
    );
}

#[test]
fn constant_sample_reports_one() {
    let (w, p) = shapiro_wilk(&[4.0, 4.0, 4.0, 4.0]).unwrap();
    assert_eq!(w, 1.0);
    assert_eq!(p, 1.0);

    let g = GroupValues::new("MT", vec![0.0; 4]);
    assert!(g.is_constant());
    let r = shapiro_group(&g).unwrap();
    assert!(r.normal);
}

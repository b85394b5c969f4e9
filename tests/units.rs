use gdat_tools::units::{
    AVOGADRO, DEFAULT_VOLUME_UM3, micromolar_to_molecules, molecules_to_micromolar,
};

#[test]
fn one_micromolar_in_default_volume() {
    let molecules = 1e-6 * DEFAULT_VOLUME_UM3 * 1e-15 * AVOGADRO;
    let um = molecules_to_micromolar(molecules, DEFAULT_VOLUME_UM3);
    assert!((um - 1.0).abs() < 1e-12);
}

#[test]
fn conversion_inverts() {
    let um = molecules_to_micromolar(500.0, 0.05);
    assert!((micromolar_to_molecules(um, 0.05) - 500.0).abs() < 1e-9);
    assert!((molecules_to_micromolar(1024.0, DEFAULT_VOLUME_UM3) - 100.0).abs() < 0.1);
}

/// Molecules per mole, to the precision used by the model's parameter sheets.
pub const AVOGADRO: f64 = 6.023e23;

pub const DEFAULT_VOLUME_UM3: f64 = 0.017;

const UM3_TO_LITRES: f64 = 1e-15;

pub fn molecules_to_micromolar(molecules: f64, volume_um3: f64) -> f64 {
    let moles = molecules / AVOGADRO;
    let litres = volume_um3 * UM3_TO_LITRES;
    moles / litres * 1e6
}

pub fn micromolar_to_molecules(micromolar: f64, volume_um3: f64) -> f64 {
    micromolar * 1e-6 * volume_um3 * UM3_TO_LITRES * AVOGADRO
}

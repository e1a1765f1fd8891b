/// Planck constant, J s
const H: f64 = 6.626_070_15e-34;
/// Electron rest mass, kg
const M0: f64 = 9.109_383_701_5e-31;
/// Elementary charge, C
const E: f64 = 1.602_176_634e-19;
/// Speed of light, m/s
const C: f64 = 2.997_924_58e8;

/// Relativistic de Broglie wavelength, in metres, of an electron
/// accelerated through `voltage` volts.
pub fn electron_wavelength(voltage: f64) -> f64 {
    H / (2.0 * M0 * E * voltage * (1.0 + (E * voltage) / (2.0 * M0 * C * C))).sqrt()
}

//! Rayleigh scattering optical depth
//!
//! Uses the broadband fit of Gueymard (SMARTS2):
//!
//! $$ \tau_R(\lambda) = \frac{p / p_0}{a_1 \lambda^4 + a_2 \lambda^2 + a_3 + a_4 \lambda^{-1}} $$
//!
//! with $\lambda$ in µm and $p$ the surface pressure.

use solo_core::values::FloatValue;

/// Standard sea-level pressure
/// unit: hPa
pub const STANDARD_PRESSURE: FloatValue = 1013.25;

const A1: FloatValue = 117.3405;
const A2: FloatValue = -1.5107;
const A3: FloatValue = 0.017535;
const A4: FloatValue = -8.7743e-4;

/// Rayleigh optical depth at `wavelength` (µm) for a surface `pressure` (hPa)
pub fn tau_rayleigh(pressure: FloatValue, wavelength: FloatValue) -> FloatValue {
    let w2 = wavelength * wavelength;
    (pressure / STANDARD_PRESSURE) / (A1 * w2 * w2 + A2 * w2 + A3 + A4 / wavelength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn standard_atmosphere_at_500nm() {
        assert_relative_eq!(
            tau_rayleigh(STANDARD_PRESSURE, 0.5),
            0.1434332035924068,
            max_relative = 1e-12
        );
    }

    #[test]
    fn scales_linearly_with_pressure() {
        let full = tau_rayleigh(STANDARD_PRESSURE, 0.7);
        let half = tau_rayleigh(STANDARD_PRESSURE / 2.0, 0.7);
        assert_relative_eq!(half * 2.0, full, max_relative = 1e-14);
    }

    #[test]
    fn decreases_with_wavelength() {
        let taus: Vec<_> = [0.3, 0.5, 1.0, 2.0, 4.0]
            .iter()
            .map(|w| tau_rayleigh(STANDARD_PRESSURE, *w))
            .collect();
        assert!(taus.windows(2).all(|pair| pair[0] > pair[1]));
    }
}

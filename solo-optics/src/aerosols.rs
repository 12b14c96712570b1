//! Aerosol extinction optical depth
//!
//! Two-regime Ångström law as used by SMARTS2. Below 0.5 µm the exponent
//! `alpha1` applies, at and above 0.5 µm the exponent `alpha2`. The turbidity
//! `beta` is the optical depth at 1 µm of the long-wavelength branch, and the
//! short-wavelength branch is scaled so the two meet at 0.5 µm:
//!
//! $$ \tau_A(\lambda) = \beta \lambda^{-\alpha_2}, \quad \lambda \geq 0.5 $$
//! $$ \tau_A(\lambda) = \beta \, 0.5^{\alpha_1 - \alpha_2} \lambda^{-\alpha_1}, \quad \lambda < 0.5 $$

use solo_core::values::FloatValue;

/// Wavelength separating the two Ångström regimes
/// unit: µm
pub const ANGSTROM_BREAK: FloatValue = 0.5;

/// Aerosol optical depth at `wavelength` (µm)
pub fn tau_aerosols(
    alpha1: FloatValue,
    alpha2: FloatValue,
    beta: FloatValue,
    wavelength: FloatValue,
) -> FloatValue {
    if wavelength >= ANGSTROM_BREAK {
        beta * wavelength.powf(-alpha2)
    } else {
        beta * ANGSTROM_BREAK.powf(alpha1 - alpha2) * wavelength.powf(-alpha1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use is_close::is_close;

    #[test]
    fn beta_is_optical_depth_at_one_micron() {
        assert!(is_close!(tau_aerosols(1.3, 1.3, 0.1, 1.0), 0.1));
        assert!(is_close!(tau_aerosols(0.9, 1.7, 0.25, 1.0), 0.25));
    }

    #[test]
    fn continuous_at_break() {
        let below = tau_aerosols(1.1, 1.4, 0.08, ANGSTROM_BREAK - 1e-12);
        let at = tau_aerosols(1.1, 1.4, 0.08, ANGSTROM_BREAK);
        assert_relative_eq!(below, at, max_relative = 1e-9);
    }

    #[test]
    fn short_wavelength_branch_uses_alpha1() {
        let ratio = tau_aerosols(1.1, 1.4, 0.08, 0.3) / tau_aerosols(1.1, 1.4, 0.08, 0.4);
        assert_relative_eq!(ratio, (0.3_f64 / 0.4).powf(-1.1), max_relative = 1e-12);
    }

    #[test]
    fn zero_turbidity_is_clean_air() {
        assert_eq!(tau_aerosols(1.3, 1.3, 0.0, 0.55), 0.0);
    }
}

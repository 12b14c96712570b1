//! Atmospheres and their optical depths
//!
//! An [`Atmosphere`] holds either a single scenario (0D) or a batch of
//! independent scenarios (1D). Optical depths are evaluated for every scenario
//! at every requested wavelength, so the result shape is the atmosphere shape
//! followed by the wavelength shape:
//!
//! | Atmosphere | Wavelength | Result   |
//! |------------|------------|----------|
//! | `()`       | `()`       | `()`     |
//! | `()`       | `(W,)`     | `(W,)`   |
//! | `(S,)`     | `()`       | `(S,)`   |
//! | `(S,)`     | `(W,)`     | `(S, W)` |
//!
//! ```rust
//! use solo_optics::{Atmosphere, AtmosphereScenario};
//!
//! let atm = Atmosphere::batch(vec![AtmosphereScenario::default(); 3]).unwrap();
//! let tau = atm.tau_rayleigh(vec![0.4, 0.5]).unwrap();
//! assert_eq!(tau.shape(), &[3, 2]);
//! ```
//!
//! Atmospheres can also be described in TOML, either as a single `[scenario]`
//! table or as a `[[scenarios]]` array:
//!
//! ```toml
//! [[scenarios]]
//! pressure = 1013.25
//! alpha1 = 1.3
//! alpha2 = 1.3
//! beta = 0.1
//! ```

use crate::aerosols;
use crate::rayleigh::{self, STANDARD_PRESSURE};
use crate::wavelength::Wavelength;
use log::debug;
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use solo_core::errors::{SoloError, SoloResult};
use solo_core::values::{FieldValue, FloatValue};
use std::path::Path;

/// State of a single atmospheric scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtmosphereScenario {
    /// Surface pressure
    /// unit: hPa
    pub pressure: FloatValue,
    /// Ångström exponent below 0.5 µm
    pub alpha1: FloatValue,
    /// Ångström exponent at and above 0.5 µm
    pub alpha2: FloatValue,
    /// Ångström turbidity coefficient, the aerosol optical depth at 1 µm
    pub beta: FloatValue,
}

impl Default for AtmosphereScenario {
    fn default() -> Self {
        Self {
            pressure: STANDARD_PRESSURE,
            alpha1: 1.3,
            alpha2: 1.3,
            beta: 0.1,
        }
    }
}

impl AtmosphereScenario {
    pub fn validate(&self) -> SoloResult<()> {
        let fields = [
            ("pressure", self.pressure),
            ("alpha1", self.alpha1),
            ("alpha2", self.alpha2),
            ("beta", self.beta),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(SoloError::validation(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if self.pressure <= 0.0 {
            return Err(SoloError::validation(format!(
                "pressure must be positive, got {}",
                self.pressure
            )));
        }
        if self.beta < 0.0 {
            return Err(SoloError::validation(format!(
                "beta must not be negative, got {}",
                self.beta
            )));
        }
        Ok(())
    }

    /// Rayleigh optical depth at a single wavelength (µm)
    pub fn tau_rayleigh(&self, wavelength: FloatValue) -> FloatValue {
        rayleigh::tau_rayleigh(self.pressure, wavelength)
    }

    /// Aerosol optical depth at a single wavelength (µm)
    pub fn tau_aerosols(&self, wavelength: FloatValue) -> FloatValue {
        aerosols::tau_aerosols(self.alpha1, self.alpha2, self.beta, wavelength)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum Profile {
    Single(AtmosphereScenario),
    Batch(Vec<AtmosphereScenario>),
}

/// One (0D) or many (1D) atmospheric scenarios
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atmosphere {
    profile: Profile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtmosphereConfig {
    scenario: Option<AtmosphereScenario>,
    scenarios: Option<Vec<AtmosphereScenario>>,
}

impl Atmosphere {
    /// Zero-dimensional atmosphere holding a single scenario
    pub fn single(scenario: AtmosphereScenario) -> SoloResult<Self> {
        scenario.validate()?;
        Ok(Self {
            profile: Profile::Single(scenario),
        })
    }

    /// One-dimensional atmosphere holding `scenarios.len()` scenarios
    ///
    /// A batch of one scenario is still one-dimensional.
    pub fn batch(scenarios: Vec<AtmosphereScenario>) -> SoloResult<Self> {
        if scenarios.is_empty() {
            return Err(SoloError::validation(
                "an atmosphere needs at least one scenario",
            ));
        }
        for (index, scenario) in scenarios.iter().enumerate() {
            scenario.validate().map_err(|err| match err {
                SoloError::Validation(message) => {
                    SoloError::Validation(format!("scenario {index}: {message}"))
                }
                other => other,
            })?;
        }
        Ok(Self {
            profile: Profile::Batch(scenarios),
        })
    }

    /// Build from per-field values
    ///
    /// All scalars give a 0D atmosphere. Otherwise scalars are broadcast
    /// against the array-valued fields, which must share one length.
    pub fn from_fields(
        pressure: impl Into<FieldValue>,
        alpha1: impl Into<FieldValue>,
        alpha2: impl Into<FieldValue>,
        beta: impl Into<FieldValue>,
    ) -> SoloResult<Self> {
        let pressure = pressure.into();
        let alpha1 = alpha1.into();
        let alpha2 = alpha2.into();
        let beta = beta.into();

        let length = FieldValue::common_length(&[
            ("pressure", &pressure),
            ("alpha1", &alpha1),
            ("alpha2", &alpha2),
            ("beta", &beta),
        ])?;

        let pressure = pressure.broadcast(length);
        let alpha1 = alpha1.broadcast(length);
        let alpha2 = alpha2.broadcast(length);
        let beta = beta.broadcast(length);

        let mut scenarios: Vec<AtmosphereScenario> = pressure
            .iter()
            .zip(alpha1.iter())
            .zip(alpha2.iter())
            .zip(beta.iter())
            .map(|(((pressure, alpha1), alpha2), beta)| AtmosphereScenario {
                pressure,
                alpha1,
                alpha2,
                beta,
            })
            .collect();

        match length {
            Some(_) => Self::batch(scenarios),
            None => match scenarios.pop() {
                Some(scenario) => Self::single(scenario),
                None => Err(SoloError::validation("no atmospheric scenario given")),
            },
        }
    }

    /// Parse an atmosphere from its TOML description
    pub fn from_toml_str(text: &str) -> SoloResult<Self> {
        let config: AtmosphereConfig = toml::from_str(text)?;
        match (config.scenario, config.scenarios) {
            (Some(scenario), None) => Self::single(scenario),
            (None, Some(scenarios)) => Self::batch(scenarios),
            _ => Err(SoloError::validation(
                "expected exactly one of [scenario] or [[scenarios]]",
            )),
        }
    }

    /// Load an atmosphere from a TOML file, see [`Atmosphere::from_toml_str`]
    pub fn from_file(path: impl AsRef<Path>) -> SoloResult<Self> {
        let path = path.as_ref();
        let atmosphere = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        debug!(
            "Loaded atmosphere with shape {:?} from {}",
            atmosphere.shape(),
            path.display()
        );
        Ok(atmosphere)
    }

    /// Number of scenarios, `None` for a 0D atmosphere
    pub fn nscen(&self) -> Option<usize> {
        match &self.profile {
            Profile::Single(_) => None,
            Profile::Batch(scenarios) => Some(scenarios.len()),
        }
    }

    /// `[]` for a 0D atmosphere and `[nscen]` for a 1D atmosphere
    pub fn shape(&self) -> Vec<usize> {
        self.nscen().into_iter().collect()
    }

    pub fn scenarios(&self) -> &[AtmosphereScenario] {
        match &self.profile {
            Profile::Single(scenario) => std::slice::from_ref(scenario),
            Profile::Batch(scenarios) => scenarios,
        }
    }

    /// Rayleigh optical depth with shape `atmosphere shape + wavelength shape`
    ///
    /// `wavelength` is in µm.
    ///
    /// # Errors
    ///
    /// * [`SoloError::Validation`] for empty, non-finite or non-positive wavelengths
    /// * [`SoloError::Domain`] for wavelengths outside of the supported range
    pub fn tau_rayleigh(&self, wavelength: impl Into<FieldValue>) -> SoloResult<ArrayD<FloatValue>> {
        self.evaluate(wavelength, AtmosphereScenario::tau_rayleigh)
    }

    /// Aerosol optical depth with shape `atmosphere shape + wavelength shape`
    ///
    /// Errors as for [`Atmosphere::tau_rayleigh`].
    pub fn tau_aerosols(&self, wavelength: impl Into<FieldValue>) -> SoloResult<ArrayD<FloatValue>> {
        self.evaluate(wavelength, AtmosphereScenario::tau_aerosols)
    }

    fn evaluate<F>(
        &self,
        wavelength: impl Into<FieldValue>,
        tau: F,
    ) -> SoloResult<ArrayD<FloatValue>>
    where
        F: Fn(&AtmosphereScenario, FloatValue) -> FloatValue,
    {
        let wavelength = Wavelength::new(wavelength)?;

        let mut shape = self.shape();
        shape.extend_from_slice(wavelength.shape());

        // Scenario-major, matching the row-major layout of the result
        let tau = &tau;
        let wavelength = &wavelength;
        let values: Vec<FloatValue> = self
            .scenarios()
            .iter()
            .flat_map(move |scenario| wavelength.iter().map(move |w| tau(scenario, w)))
            .collect();

        ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|err| SoloError::validation(format!("invalid result shape: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Ix2};

    fn scenario() -> AtmosphereScenario {
        AtmosphereScenario {
            pressure: 1013.25,
            alpha1: 1.1,
            alpha2: 1.4,
            beta: 0.08,
        }
    }

    #[test]
    fn single_has_no_scenario_dimension() {
        let atm = Atmosphere::single(scenario()).unwrap();
        assert_eq!(atm.nscen(), None);
        assert!(atm.shape().is_empty());
        assert_eq!(atm.scenarios().len(), 1);
    }

    #[test]
    fn batch_of_one_is_one_dimensional() {
        let atm = Atmosphere::batch(vec![scenario()]).unwrap();
        assert_eq!(atm.nscen(), Some(1));
        assert_eq!(atm.tau_rayleigh(0.5).unwrap().shape(), &[1]);
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(
            Atmosphere::batch(vec![]),
            Err(SoloError::Validation(_))
        ));
    }

    #[test]
    fn invalid_scenarios_are_rejected() {
        let mut bad = scenario();
        bad.pressure = -1.0;
        assert!(matches!(
            Atmosphere::single(bad.clone()),
            Err(SoloError::Validation(_))
        ));

        let err = Atmosphere::batch(vec![scenario(), bad]).unwrap_err();
        assert!(err.to_string().contains("scenario 1"));

        let mut bad = scenario();
        bad.beta = -0.1;
        assert!(Atmosphere::single(bad).is_err());

        let mut bad = scenario();
        bad.alpha1 = f64::NAN;
        assert!(Atmosphere::single(bad).is_err());
    }

    #[test]
    fn from_fields_scalars_give_0d() {
        let atm = Atmosphere::from_fields(1013.25, 1.1, 1.4, 0.08).unwrap();
        assert_eq!(atm, Atmosphere::single(scenario()).unwrap());
    }

    #[test]
    fn from_fields_broadcasts_scalars() {
        let atm = Atmosphere::from_fields(array![1013.25, 850.0], 1.1, 1.4, 0.08).unwrap();
        assert_eq!(atm.nscen(), Some(2));
        assert_eq!(atm.scenarios()[0], scenario());
        assert_eq!(atm.scenarios()[1].pressure, 850.0);
        assert_eq!(atm.scenarios()[1].beta, 0.08);
    }

    #[test]
    fn from_fields_rejects_mismatched_lengths() {
        let err = Atmosphere::from_fields(array![1013.25, 850.0], array![1.1, 1.2, 1.3], 1.4, 0.08)
            .unwrap_err();
        assert!(matches!(err, SoloError::Validation(_)));
    }

    #[test]
    fn result_layout_is_scenario_major() {
        let mut second = scenario();
        second.pressure = 506.625;
        let atm = Atmosphere::batch(vec![scenario(), second]).unwrap();

        let tau = atm.tau_rayleigh(vec![0.4, 0.8]).unwrap();
        assert_eq!(tau.shape(), &[2, 2]);
        let tau = tau.into_dimensionality::<Ix2>().unwrap();
        assert_relative_eq!(tau[[1, 0]] * 2.0, tau[[0, 0]], max_relative = 1e-14);
        assert_relative_eq!(tau[[1, 1]] * 2.0, tau[[0, 1]], max_relative = 1e-14);
        assert!(tau[[0, 0]] > tau[[0, 1]]);
    }

    #[test]
    fn wavelength_errors_propagate() {
        let atm = Atmosphere::single(scenario()).unwrap();
        assert!(matches!(
            atm.tau_rayleigh(-0.5),
            Err(SoloError::Validation(_))
        ));
        assert!(matches!(atm.tau_aerosols(10.0), Err(SoloError::Domain(_))));
    }

    #[test]
    fn toml_single_scenario() {
        let atm = Atmosphere::from_toml_str(
            r#"
            [scenario]
            pressure = 1013.25
            alpha1 = 1.1
            alpha2 = 1.4
            beta = 0.08
            "#,
        )
        .unwrap();
        assert_eq!(atm, Atmosphere::single(scenario()).unwrap());
    }

    #[test]
    fn toml_scenarios_use_defaults() {
        let atm = Atmosphere::from_toml_str(
            r#"
            [[scenarios]]
            pressure = 850.0

            [[scenarios]]
            beta = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(atm.nscen(), Some(2));
        assert_eq!(atm.scenarios()[0].pressure, 850.0);
        assert_eq!(atm.scenarios()[0].beta, 0.1);
        assert_eq!(atm.scenarios()[1].pressure, STANDARD_PRESSURE);
        assert_eq!(atm.scenarios()[1].beta, 0.2);
    }

    #[test]
    fn toml_requires_exactly_one_layout() {
        let err = Atmosphere::from_toml_str("").unwrap_err();
        assert!(matches!(err, SoloError::Validation(_)));

        let err = Atmosphere::from_toml_str("[scenario]\n[[scenarios]]\n").unwrap_err();
        assert!(matches!(err, SoloError::Validation(_)));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = Atmosphere::from_toml_str("[scenario]\nozone = 0.3\n").unwrap_err();
        assert!(matches!(err, SoloError::Config(_)));
    }
}

//! Validated wavelengths
//!
//! Optical depths are only defined over the spectral range covered by the
//! parameterisations, `[MIN_WAVELENGTH, MAX_WAVELENGTH]` µm.

use solo_core::errors::{SoloError, SoloResult};
use solo_core::values::{FieldValue, FloatValue};

/// unit: µm
pub const MIN_WAVELENGTH: FloatValue = 0.28;
/// unit: µm
pub const MAX_WAVELENGTH: FloatValue = 4.0;

/// A scalar or 1D array of wavelengths in µm, checked against the supported range
#[derive(Debug, Clone, PartialEq)]
pub struct Wavelength(FieldValue);

impl Wavelength {
    /// # Errors
    ///
    /// * [`SoloError::Validation`] for empty arrays, non-finite or non-positive values
    /// * [`SoloError::Domain`] for values outside of the supported range
    pub fn new(values: impl Into<FieldValue>) -> SoloResult<Self> {
        let values = values.into();

        if values.is_empty() {
            return Err(SoloError::validation("wavelength must not be empty"));
        }
        values.ensure_finite("wavelength")?;
        if let Some(value) = values.iter().find(|value| *value <= 0.0) {
            return Err(SoloError::validation(format!(
                "wavelength must be positive, got {value}"
            )));
        }
        values.ensure_within("wavelength", MIN_WAVELENGTH, MAX_WAVELENGTH)?;

        Ok(Self(values))
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn iter(&self) -> impl Iterator<Item = FloatValue> + '_ {
        self.0.iter()
    }

    pub fn values(&self) -> &FieldValue {
        &self.0
    }
}

impl TryFrom<FieldValue> for Wavelength {
    type Error = SoloError;

    fn try_from(values: FieldValue) -> Result<Self, Self::Error> {
        Wavelength::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_range() {
        let wavelength = Wavelength::new(vec![MIN_WAVELENGTH, 0.55, MAX_WAVELENGTH]).unwrap();
        assert_eq!(wavelength.shape(), &[3]);

        let wavelength = Wavelength::new(0.55).unwrap();
        assert!(wavelength.shape().is_empty());
    }

    #[test]
    fn negative_is_validation_error() {
        assert!(matches!(
            Wavelength::new(-0.5),
            Err(SoloError::Validation(_))
        ));
        assert!(matches!(
            Wavelength::new(vec![0.5, 0.0]),
            Err(SoloError::Validation(_))
        ));
    }

    #[test]
    fn non_finite_is_validation_error() {
        assert!(matches!(
            Wavelength::new(f64::NAN),
            Err(SoloError::Validation(_))
        ));
    }

    #[test]
    fn empty_is_validation_error() {
        assert!(matches!(
            Wavelength::new(Vec::<FloatValue>::new()),
            Err(SoloError::Validation(_))
        ));
    }

    #[test]
    fn outside_range_is_domain_error() {
        assert!(matches!(Wavelength::new(0.2), Err(SoloError::Domain(_))));
        assert!(matches!(
            Wavelength::new(vec![0.5, 5.0]),
            Err(SoloError::Domain(_))
        ));
    }
}

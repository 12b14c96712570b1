//! Python bindings for atmospheres and optical depths

use crate::atmosphere::{Atmosphere, AtmosphereScenario};
use numpy::{PyArrayDyn, ToPyArray};
use pyo3::exceptions::PyAttributeError;
use pyo3::prelude::*;
use solo_core::python::FieldArg;
use solo_core::values::{FieldValue, FloatValue};
use std::path::PathBuf;

fn or_default(arg: Option<FieldArg<'_>>, default: FloatValue) -> FieldValue {
    arg.map(FieldValue::from)
        .unwrap_or(FieldValue::Scalar(default))
}

/// Python wrapper for Atmosphere
///
/// Scalar arguments give a 0D atmosphere, array arguments a 1D atmosphere
/// with one scenario per element.
///
/// Example:
///     atm = Atmosphere(pressure=[1013.25, 850.0], beta=0.1)
///     atm.tau_rayleigh([0.4, 0.5, 0.6]).shape  # (2, 3)
#[pyclass(frozen, name = "Atmosphere", module = "solo._lib.optics")]
#[derive(Debug, Clone)]
pub struct PyAtmosphere(pub Atmosphere);

#[pymethods]
impl PyAtmosphere {
    #[new]
    #[pyo3(signature = (pressure=None, alpha1=None, alpha2=None, beta=None))]
    fn new(
        pressure: Option<FieldArg<'_>>,
        alpha1: Option<FieldArg<'_>>,
        alpha2: Option<FieldArg<'_>>,
        beta: Option<FieldArg<'_>>,
    ) -> PyResult<Self> {
        let defaults = AtmosphereScenario::default();
        let atmosphere = Atmosphere::from_fields(
            or_default(pressure, defaults.pressure),
            or_default(alpha1, defaults.alpha1),
            or_default(alpha2, defaults.alpha2),
            or_default(beta, defaults.beta),
        )?;
        Ok(Self(atmosphere))
    }

    /// Load an atmosphere from a TOML file
    #[staticmethod]
    fn from_file(path: PathBuf) -> PyResult<Self> {
        Ok(Self(Atmosphere::from_file(path)?))
    }

    /// Number of scenarios of a 1D atmosphere
    #[getter]
    fn nscen(&self) -> PyResult<usize> {
        self.0
            .nscen()
            .ok_or_else(|| PyAttributeError::new_err("a 0D atmosphere has no 'nscen'"))
    }

    #[getter]
    fn shape(&self) -> Vec<usize> {
        self.0.shape()
    }

    /// Rayleigh optical depth at the given wavelengths (µm)
    fn tau_rayleigh<'py>(
        &self,
        py: Python<'py>,
        wavelength: FieldArg<'py>,
    ) -> PyResult<Bound<'py, PyArrayDyn<FloatValue>>> {
        Ok(self.0.tau_rayleigh(wavelength)?.to_pyarray(py))
    }

    /// Aerosol optical depth at the given wavelengths (µm)
    fn tau_aerosols<'py>(
        &self,
        py: Python<'py>,
        wavelength: FieldArg<'py>,
    ) -> PyResult<Bound<'py, PyArrayDyn<FloatValue>>> {
        Ok(self.0.tau_aerosols(wavelength)?.to_pyarray(py))
    }

    fn __repr__(&self) -> String {
        format!("Atmosphere(shape={:?})", self.0.shape())
    }
}

#[pymodule]
pub fn optics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAtmosphere>()?;
    Ok(())
}

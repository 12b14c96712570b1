use super::{field_to_py, FieldArg};
use crate::errors::SoloError;
use crate::geometry::{AngleMode, Geometry};
use crate::values::FieldValue;
use pyo3::prelude::*;
use std::path::PathBuf;

/// Python wrapper for Geometry
///
/// Example:
///     geo = Geometry(day=152, sec=None, lat=None, lon=None, sza=60, mode="deg")
///     geo.mu0  # 0.5
///     Geometry(152, 25311, 28.31, -16.5, 80.08686, "deg")
#[pyclass(frozen, name = "Geometry", module = "solo._lib.core")]
#[derive(Debug, Clone)]
pub struct PyGeometry(pub Geometry);

#[pymethods]
impl PyGeometry {
    #[new]
    #[pyo3(signature = (day, sec=None, lat=None, lon=None, sza=None, mode="deg"))]
    fn new(
        day: FieldArg<'_>,
        sec: Option<FieldArg<'_>>,
        lat: Option<FieldArg<'_>>,
        lon: Option<FieldArg<'_>>,
        sza: Option<FieldArg<'_>>,
        mode: &str,
    ) -> PyResult<Self> {
        // Optional only so that it can follow lon positionally
        let sza = sza.ok_or_else(|| SoloError::validation("sza is required"))?;
        let mode: AngleMode = mode.parse()?;
        let geometry = Geometry::new(
            day,
            sec.map(FieldValue::from),
            lat.map(FieldValue::from),
            lon.map(FieldValue::from),
            sza,
            mode,
        )?;
        Ok(Self(geometry))
    }

    /// Load a geometry from a data file
    #[staticmethod]
    fn from_file(path: PathBuf) -> PyResult<Self> {
        Ok(Self(Geometry::from_file(path)?))
    }

    /// Write the geometry to a data file
    fn save(&self, path: PathBuf) -> PyResult<()> {
        Ok(self.0.save(path)?)
    }

    #[getter]
    fn day<'py>(&self, py: Python<'py>) -> Bound<'py, PyAny> {
        field_to_py(py, self.0.day())
    }

    #[getter]
    fn sec<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyAny>> {
        self.0.sec().map(|value| field_to_py(py, value))
    }

    /// Latitude in radians
    #[getter]
    fn lat<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyAny>> {
        self.0.lat().map(|value| field_to_py(py, value))
    }

    /// Longitude in radians
    #[getter]
    fn lon<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyAny>> {
        self.0.lon().map(|value| field_to_py(py, value))
    }

    /// Solar zenith angle in radians
    #[getter]
    fn sza<'py>(&self, py: Python<'py>) -> Bound<'py, PyAny> {
        field_to_py(py, self.0.sza())
    }

    #[getter]
    fn mu0<'py>(&self, py: Python<'py>) -> Bound<'py, PyAny> {
        field_to_py(py, self.0.mu0())
    }

    fn is_close(&self, other: &PyGeometry) -> bool {
        self.0.is_close(&other.0)
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Geometry(shape={:?}, location={})",
            self.0.shape(),
            self.0.location().is_some()
        )
    }
}

//! Python bindings for the core types
//!
//! Converts between Python scalars / numpy arrays and [`FieldValue`], maps
//! [`SoloError`] onto Python exceptions and exposes [`PyGeometry`].

mod geometry;

use crate::errors::SoloError;
use crate::values::{FieldValue, FloatValue};
use numpy::{PyReadonlyArray0, PyReadonlyArray1, ToPyArray};
use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyFloat;

pub use geometry::PyGeometry;

create_exception!(
    solo,
    ValidationError,
    PyValueError,
    "Malformed or shape-inconsistent arguments."
);
create_exception!(solo, ParseError, PyValueError, "Malformed data file.");
create_exception!(
    solo,
    DomainError,
    PyValueError,
    "Value outside of its physical domain."
);

impl From<SoloError> for PyErr {
    fn from(err: SoloError) -> PyErr {
        let message = err.to_string();
        match err {
            SoloError::Validation(_) | SoloError::Config(_) => ValidationError::new_err(message),
            SoloError::Parse { .. } => ParseError::new_err(message),
            SoloError::Domain(_) => DomainError::new_err(message),
            SoloError::Io(err) => PyErr::from(err),
        }
    }
}

/// A Python argument accepted wherever a scalar or 1D array is expected
#[derive(FromPyObject)]
pub enum FieldArg<'py> {
    Array(PyReadonlyArray1<'py, FloatValue>),
    /// 0-d numpy array
    Array0(PyReadonlyArray0<'py, FloatValue>),
    Scalar(FloatValue),
    Sequence(Vec<FloatValue>),
}

impl From<FieldArg<'_>> for FieldValue {
    fn from(arg: FieldArg<'_>) -> Self {
        match arg {
            FieldArg::Array(values) => FieldValue::Array(values.as_array().to_owned()),
            FieldArg::Array0(value) => FieldValue::Scalar(value.as_array()[()]),
            FieldArg::Scalar(value) => FieldValue::Scalar(value),
            FieldArg::Sequence(values) => FieldValue::from(values),
        }
    }
}

/// Scalars become Python floats and arrays become numpy arrays
pub fn field_to_py<'py>(py: Python<'py>, value: &FieldValue) -> Bound<'py, PyAny> {
    match value {
        FieldValue::Scalar(value) => PyFloat::new(py, *value).into_any(),
        FieldValue::Array(values) => values.to_pyarray(py).into_any(),
    }
}

#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGeometry>()?;
    m.add("ValidationError", m.py().get_type::<ValidationError>())?;
    m.add("ParseError", m.py().get_type::<ParseError>())?;
    m.add("DomainError", m.py().get_type::<DomainError>())?;
    Ok(())
}

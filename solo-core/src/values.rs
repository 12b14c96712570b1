//! Scalar-or-array field values
//!
//! Most quantities in solo may be given either as a single number or as a
//! one-dimensional array of numbers (one entry per scenario, record or
//! wavelength). [`FieldValue`] is the tagged union used for all of them so that
//! shape handling lives in one place.
//!
//! ```rust
//! use solo_core::values::FieldValue;
//!
//! let scalar = FieldValue::from(60.0);
//! let array = FieldValue::from(vec![60.0, 50.4, 15.1]);
//! assert!(scalar.shape().is_empty());
//! assert_eq!(array.shape(), &[3]);
//!
//! // Scalars broadcast against arrays
//! let length = FieldValue::common_length(&[("sza", &array), ("day", &scalar)]).unwrap();
//! assert_eq!(scalar.broadcast(length), FieldValue::from(vec![60.0, 60.0, 60.0]));
//! ```

use crate::errors::{SoloError, SoloResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub type FloatValue = f64;

/// Relative tolerance used by [`FieldValue::is_close`]
pub const DEFAULT_RTOL: FloatValue = 1e-5;
/// Absolute tolerance used by [`FieldValue::is_close`]
pub const DEFAULT_ATOL: FloatValue = 1e-8;

/// A value that is either a scalar or a one-dimensional array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single value with shape `()`
    Scalar(FloatValue),
    /// `n` values with shape `(n,)`
    Array(Array1<FloatValue>),
}

impl FieldValue {
    /// Shape of the value: `[]` for scalars and `[n]` for arrays
    pub fn shape(&self) -> &[usize] {
        match self {
            FieldValue::Scalar(_) => &[],
            FieldValue::Array(values) => values.shape(),
        }
    }

    /// Number of elements (1 for a scalar)
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Scalar(_) => 1,
            FieldValue::Array(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, FieldValue::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<FloatValue> {
        match self {
            FieldValue::Scalar(value) => Some(*value),
            FieldValue::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array1<FloatValue>> {
        match self {
            FieldValue::Scalar(_) => None,
            FieldValue::Array(values) => Some(values),
        }
    }

    /// Value at `index` using broadcasting rules
    ///
    /// A scalar yields its value for every index.
    pub fn value_at(&self, index: usize) -> Option<FloatValue> {
        match self {
            FieldValue::Scalar(value) => Some(*value),
            FieldValue::Array(values) => values.get(index).copied(),
        }
    }

    /// Iterate over the elements (a scalar yields exactly one element)
    pub fn iter(&self) -> Box<dyn Iterator<Item = FloatValue> + '_> {
        match self {
            FieldValue::Scalar(value) => Box::new(std::iter::once(*value)),
            FieldValue::Array(values) => Box::new(values.iter().copied()),
        }
    }

    /// Normalise to an array; scalars become arrays of length 1
    pub fn to_array1(&self) -> Array1<FloatValue> {
        match self {
            FieldValue::Scalar(value) => Array1::from_elem(1, *value),
            FieldValue::Array(values) => values.clone(),
        }
    }

    /// Apply `f` elementwise, preserving the shape
    pub fn map<F>(&self, f: F) -> FieldValue
    where
        F: Fn(FloatValue) -> FloatValue,
    {
        match self {
            FieldValue::Scalar(value) => FieldValue::Scalar(f(*value)),
            FieldValue::Array(values) => FieldValue::Array(values.mapv(f)),
        }
    }

    /// Fail with a validation error if any element is NaN or infinite
    pub fn ensure_finite(&self, name: &str) -> SoloResult<()> {
        match self.iter().find(|value| !value.is_finite()) {
            Some(value) => Err(SoloError::validation(format!(
                "{name} must be finite, got {value}"
            ))),
            None => Ok(()),
        }
    }

    /// Fail with a domain error if any element lies outside `[min, max]`
    pub fn ensure_within(&self, name: &str, min: FloatValue, max: FloatValue) -> SoloResult<()> {
        match self.iter().find(|value| *value < min || *value > max) {
            Some(value) => Err(SoloError::domain(format!(
                "{name}={value} is outside of the range [{min}, {max}]"
            ))),
            None => Ok(()),
        }
    }

    /// Common length of a set of named fields
    ///
    /// Returns `None` when every field is a scalar, otherwise the shared length
    /// of the array-valued fields. Arrays with differing lengths, or empty
    /// arrays, are rejected.
    pub fn common_length(fields: &[(&str, &FieldValue)]) -> SoloResult<Option<usize>> {
        let mut common: Option<(&str, usize)> = None;

        for &(name, field) in fields {
            let Some(values) = field.as_array() else {
                continue;
            };
            if values.is_empty() {
                return Err(SoloError::validation(format!("{name} must not be empty")));
            }
            match common {
                None => common = Some((name, values.len())),
                Some((first, length)) if length != values.len() => {
                    return Err(SoloError::validation(format!(
                        "shape mismatch: {first} has shape ({length},) but {name} has shape ({},)",
                        values.len()
                    )))
                }
                Some(_) => {}
            }
        }

        Ok(common.map(|(_, length)| length))
    }

    /// Broadcast to the length returned by [`FieldValue::common_length`]
    ///
    /// `None` leaves the value untouched. Array lengths are assumed to have
    /// already been checked.
    pub fn broadcast(&self, length: Option<usize>) -> FieldValue {
        match (self, length) {
            (FieldValue::Scalar(value), Some(length)) => {
                FieldValue::Array(Array1::from_elem(length, *value))
            }
            _ => self.clone(),
        }
    }

    /// Elementwise `|a - b| <= atol + rtol * |b|` with identical shapes
    ///
    /// Matches the semantics of `numpy.allclose` except that shapes are not
    /// broadcast. NaN never compares close.
    pub fn allclose(&self, other: &FieldValue, rtol: FloatValue, atol: FloatValue) -> bool {
        self.shape() == other.shape()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| (a - b).abs() <= atol + rtol * b.abs())
    }

    /// [`FieldValue::allclose`] with the default tolerances
    pub fn is_close(&self, other: &FieldValue) -> bool {
        self.allclose(other, DEFAULT_RTOL, DEFAULT_ATOL)
    }
}

impl From<FloatValue> for FieldValue {
    fn from(value: FloatValue) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Array1<FloatValue>> for FieldValue {
    fn from(values: Array1<FloatValue>) -> Self {
        FieldValue::Array(values)
    }
}

impl From<Vec<FloatValue>> for FieldValue {
    fn from(values: Vec<FloatValue>) -> Self {
        FieldValue::Array(Array1::from_vec(values))
    }
}

impl From<&[FloatValue]> for FieldValue {
    fn from(values: &[FloatValue]) -> Self {
        FieldValue::Array(Array1::from_vec(values.to_vec()))
    }
}

impl<const N: usize> From<[FloatValue; N]> for FieldValue {
    fn from(values: [FloatValue; N]) -> Self {
        FieldValue::Array(Array1::from_vec(values.to_vec()))
    }
}

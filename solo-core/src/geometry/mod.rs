//! Solar illumination geometry
//!
//! A [`Geometry`] describes one or many illumination instants: the day of the
//! year, optionally the time of day and the geographic location, and the solar
//! zenith angle. Angles are always stored in radians; the [`AngleMode`] given at
//! construction only controls how the inputs are interpreted.
//!
//! ```rust
//! use solo_core::geometry::{AngleMode, Geometry};
//!
//! let geo = Geometry::from_zenith(152.0, 60.0, AngleMode::Deg).unwrap();
//! assert!(geo.sec().is_none());
//! assert!((geo.mu0().as_scalar().unwrap() - 0.5).abs() < 1e-12);
//! ```
//!
//! Geometries can also be read from whitespace-delimited data files, see
//! [`Geometry::from_file`].

mod file;

use crate::errors::{SoloError, SoloResult};
use crate::values::{FieldValue, FloatValue};
use log::warn;
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

pub const SECONDS_PER_DAY: FloatValue = 86400.0;

/// Valid day-of-year values lie in `[FIRST_DAY, LAST_DAY)`
pub const FIRST_DAY: FloatValue = 1.0;
pub const LAST_DAY: FloatValue = 367.0;

// Absorbs rounding when converting boundary angles such as 90 degrees
const ANGLE_SLACK: FloatValue = 1e-12;

/// Unit of the angles passed to [`Geometry::new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AngleMode {
    /// Degrees (`"deg"`)
    Deg,
    /// Radians (`"rad"`)
    Rad,
}

impl AngleMode {
    /// Convert `value` from this unit to radians
    pub fn to_radians(self, value: &FieldValue) -> FieldValue {
        match self {
            AngleMode::Deg => value.map(FloatValue::to_radians),
            AngleMode::Rad => value.clone(),
        }
    }
}

impl FromStr for AngleMode {
    type Err = SoloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deg" => Ok(AngleMode::Deg),
            "rad" => Ok(AngleMode::Rad),
            _ => Err(SoloError::validation(format!(
                "mode must be 'deg' or 'rad', got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleMode::Deg => write!(f, "deg"),
            AngleMode::Rad => write!(f, "rad"),
        }
    }
}

/// Time of day and geographic position of an observation
///
/// These three fields are either all known or all unknown, so they are
/// grouped together and stored as a single optional value on [`Geometry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    sec: FieldValue,
    lat: FieldValue,
    lon: FieldValue,
}

impl Location {
    /// Seconds since midnight
    pub fn sec(&self) -> &FieldValue {
        &self.sec
    }

    /// Latitude in radians
    pub fn lat(&self) -> &FieldValue {
        &self.lat
    }

    /// Longitude in radians
    pub fn lon(&self) -> &FieldValue {
        &self.lon
    }
}

/// Illumination geometry for one or many instants
///
/// All fields share one shape: `()` when every input was a scalar and `(n,)`
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    day: FieldValue,
    location: Option<Location>,
    sza: FieldValue,
    mu0: FieldValue,
}

impl Geometry {
    /// Build a geometry from its components
    ///
    /// `sec`, `lat` and `lon` must be given together or not at all. `mode`
    /// selects the unit of `lat`, `lon` and `sza`. Scalars are broadcast
    /// against array-valued inputs, which must all have the same length.
    ///
    /// # Errors
    ///
    /// * [`SoloError::Validation`] for non-finite values, partially given
    ///   locations, empty arrays or mismatched array lengths
    /// * [`SoloError::Domain`] for values outside of their physical range
    pub fn new(
        day: impl Into<FieldValue>,
        sec: Option<FieldValue>,
        lat: Option<FieldValue>,
        lon: Option<FieldValue>,
        sza: impl Into<FieldValue>,
        mode: AngleMode,
    ) -> SoloResult<Self> {
        let day = day.into();
        let sza = sza.into();

        let location = match (sec, lat, lon) {
            (Some(sec), Some(lat), Some(lon)) => Some((sec, lat, lon)),
            (None, None, None) => None,
            _ => {
                return Err(SoloError::validation(
                    "sec, lat and lon must either all be given or all be omitted",
                ))
            }
        };

        let mut fields = vec![("day", &day), ("sza", &sza)];
        if let Some((sec, lat, lon)) = &location {
            fields.extend([("sec", sec), ("lat", lat), ("lon", lon)]);
        }
        for (name, field) in &fields {
            field.ensure_finite(name)?;
        }
        let length = FieldValue::common_length(&fields)?;

        let day = day.broadcast(length);
        if let Some(value) = day.iter().find(|value| !(FIRST_DAY..LAST_DAY).contains(value)) {
            return Err(SoloError::domain(format!(
                "day={value} is outside of the range [{FIRST_DAY}, {LAST_DAY})"
            )));
        }

        let sza = mode.to_radians(&sza).broadcast(length);
        sza.ensure_within("sza", -ANGLE_SLACK, PI + ANGLE_SLACK)?;
        if sza.iter().any(|angle| angle > FRAC_PI_2) {
            warn!("Solar zenith angle above 90 degrees, the sun is below the horizon");
        }

        let location = match location {
            Some((sec, lat, lon)) => {
                let sec = sec.broadcast(length);
                sec.ensure_within("sec", 0.0, SECONDS_PER_DAY)?;
                let lat = mode.to_radians(&lat).broadcast(length);
                lat.ensure_within("lat", -FRAC_PI_2 - ANGLE_SLACK, FRAC_PI_2 + ANGLE_SLACK)?;
                let lon = mode.to_radians(&lon).broadcast(length);
                lon.ensure_within("lon", -PI - ANGLE_SLACK, PI + ANGLE_SLACK)?;
                Some(Location { sec, lat, lon })
            }
            None => None,
        };

        let mu0 = sza.map(FloatValue::cos);

        Ok(Self {
            day,
            location,
            sza,
            mu0,
        })
    }

    /// Geometry without time of day or location
    pub fn from_zenith(
        day: impl Into<FieldValue>,
        sza: impl Into<FieldValue>,
        mode: AngleMode,
    ) -> SoloResult<Self> {
        Self::new(day, None, None, None, sza, mode)
    }

    /// Geometry with time of day and location
    pub fn with_location(
        day: impl Into<FieldValue>,
        sec: impl Into<FieldValue>,
        lat: impl Into<FieldValue>,
        lon: impl Into<FieldValue>,
        sza: impl Into<FieldValue>,
        mode: AngleMode,
    ) -> SoloResult<Self> {
        Self::new(
            day,
            Some(sec.into()),
            Some(lat.into()),
            Some(lon.into()),
            sza,
            mode,
        )
    }

    /// Day of the year
    pub fn day(&self) -> &FieldValue {
        &self.day
    }

    /// Seconds since midnight, if known
    pub fn sec(&self) -> Option<&FieldValue> {
        self.location.as_ref().map(Location::sec)
    }

    /// Latitude in radians, if known
    pub fn lat(&self) -> Option<&FieldValue> {
        self.location.as_ref().map(Location::lat)
    }

    /// Longitude in radians, if known
    pub fn lon(&self) -> Option<&FieldValue> {
        self.location.as_ref().map(Location::lon)
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Solar zenith angle in radians
    pub fn sza(&self) -> &FieldValue {
        &self.sza
    }

    /// Cosine of the solar zenith angle
    pub fn mu0(&self) -> &FieldValue {
        &self.mu0
    }

    pub fn shape(&self) -> &[usize] {
        self.sza.shape()
    }

    /// Number of illumination instants
    pub fn len(&self) -> usize {
        self.sza.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sza.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.sza.is_scalar()
    }

    /// Field-by-field numerical comparison
    ///
    /// Optional fields must be missing in both geometries or close in both.
    pub fn is_close(&self, other: &Geometry) -> bool {
        fn optional_close(a: Option<&FieldValue>, b: Option<&FieldValue>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.is_close(b),
                _ => false,
            }
        }

        self.day.is_close(&other.day)
            && optional_close(self.sec(), other.sec())
            && optional_close(self.lat(), other.lat())
            && optional_close(self.lon(), other.lon())
            && self.sza.is_close(&other.sza)
            && self.mu0.is_close(&other.mu0)
    }
}

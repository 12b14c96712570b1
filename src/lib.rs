//! solo: solar radiative transfer toolkit
//!
//! The [`api`] module gathers the types most users need. With the `python`
//! feature enabled the crate also builds the `solo._lib` extension module.

#[cfg(feature = "python")]
mod python;

pub mod api {
    pub use solo_core::errors::{SoloError, SoloResult};
    pub use solo_core::geometry::{AngleMode, Geometry, Location};
    pub use solo_core::values::{FieldValue, FloatValue};
    pub use solo_optics::atmosphere::{Atmosphere, AtmosphereScenario};
    pub use solo_optics::wavelength::Wavelength;
}

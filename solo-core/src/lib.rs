pub mod errors;
pub mod geometry;
#[cfg(feature = "python")]
pub mod python;
pub mod values;

pub use errors::{SoloError, SoloResult};
pub use geometry::{AngleMode, Geometry, Location};
pub use values::{FieldValue, FloatValue};

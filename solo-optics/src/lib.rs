pub mod aerosols;
pub mod atmosphere;
#[cfg(feature = "python")]
pub mod python;
pub mod rayleigh;
pub mod wavelength;

pub use atmosphere::{Atmosphere, AtmosphereScenario};
pub use wavelength::Wavelength;

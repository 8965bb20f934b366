//! ASCII rendering of the Moon as seen at a given instant.
//!
//! [`render`] turns a [`MoonPhysicalState`] into a 29-row by 60-column
//! block of text. The state usually comes from an [`EphemerisProvider`]
//! such as [`LowPrecisionEphemeris`].

pub mod ephemeris;
pub mod error;
pub mod model;
pub mod phase;
pub mod render;
pub mod timeline;

pub use ephemeris::{EphemerisProvider, LowPrecisionEphemeris};
pub use error::{MoonError, Result};
pub use model::{
    Frame, Libration, LimbSource, MoonPhysicalState, ObserverLocation, ObserverPosition,
    RenderOptions,
};
pub use phase::PhaseName;
pub use render::{render, render_grid, render_with_catalog, CharGrid, TextureCatalog};
pub use timeline::DateSteps;

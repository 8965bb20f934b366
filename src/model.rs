use crate::error::{MoonError, Result};
use serde::{Deserialize, Serialize};

/// Where the illuminated limb points, in order of authority.
///
/// An exact bright-limb position angle always wins; the waxing flag only
/// yields the coarse two-sided approximation used when the ephemeris omits it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LimbSource {
    /// Position angle of the bright limb in degrees, from celestial north
    /// increasing eastward.
    BrightLimb(f64),
    /// `true` while the Moon is waxing.
    Waxing(bool),
}

impl LimbSource {
    /// Picks the bright limb when the ephemeris supplied one.
    pub fn from_parts(bright_limb_deg: Option<f64>, waxing: bool) -> Self {
        match bright_limb_deg {
            Some(angle) => LimbSource::BrightLimb(angle),
            None => LimbSource::Waxing(waxing),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Libration {
    pub elon_deg: f64,
    pub elat_deg: f64,
}

/// Topocentric placement of the Moon for one observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverPosition {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub parallactic_angle_deg: f64,
}

/// Geographic observer location; east longitude positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl ObserverLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self> {
        check_range("latitude", latitude_deg, -90.0, 90.0)?;
        check_range("longitude", longitude_deg, -180.0, 180.0)?;
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    pub fn from_parts(
        latitude_deg: Option<f64>,
        longitude_deg: Option<f64>,
    ) -> Result<Option<Self>> {
        match (latitude_deg, longitude_deg) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).map(Some),
            (None, None) => Ok(None),
            _ => Err(MoonError::IncompleteLocation),
        }
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(MoonError::CoordinateOutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Everything the renderer needs to know about the Moon at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct MoonPhysicalState {
    /// Sun-Moon-observer angle; 0 is full, 180 is new.
    pub phase_angle_deg: f64,
    pub illuminated_fraction: f64,
    /// Kept alongside `limb` for phase naming.
    pub waxing: bool,
    pub limb: LimbSource,
    pub distance_km: f64,
    pub angular_diameter_deg: f64,
    pub libration: Libration,
    pub position: Option<ObserverPosition>,
}

impl MoonPhysicalState {
    pub fn angular_radius_deg(&self) -> f64 {
        self.angular_diameter_deg / 2.0
    }
}

/// Reference frame of the rendered raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    /// Celestial north at the top of the frame.
    #[value(alias = "celestial_up")]
    CelestialUp,
    /// Celestial north at the bottom, as in an inverting telescope.
    #[value(alias = "celestial_down")]
    CelestialDown,
    /// Local zenith at the top of the frame.
    Observer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_horizon: bool,
    /// `None` picks the observer frame when position data is present and
    /// the celestial-up frame otherwise.
    pub frame: Option<Frame>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_horizon: true,
            frame: None,
        }
    }
}

impl RenderOptions {
    pub(crate) fn resolve_frame(&self, position: Option<&ObserverPosition>) -> Frame {
        match (self.frame, position) {
            (Some(Frame::Observer), None) => Frame::CelestialUp,
            (Some(frame), _) => frame,
            (None, Some(_)) => Frame::Observer,
            (None, None) => Frame::CelestialUp,
        }
    }
}

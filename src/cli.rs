use crate::config::Settings;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::Parser;
use moonascii::{Frame, MoonError, ObserverLocation, RenderOptions};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "moonascii")]
#[command(about = "The Moon as it looks at any date and place, drawn in ASCII")]
pub(crate) struct Cli {
    /// Date/time in UTC: RFC 3339, "YYYY-MM-DD HH:MM[:SS]" or "YYYY-MM-DD". Defaults to now.
    pub(crate) date: Option<String>,

    /// Observer latitude (decimal degrees, north positive). Example: 44.31
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lat: Option<f64>,

    /// Observer longitude (decimal degrees, east positive). Example: -69.78
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lon: Option<f64>,

    /// Orientation of the drawing (default: observer when a location is known)
    #[arg(long, value_enum)]
    pub(crate) frame: Option<Frame>,

    /// Do not draw the horizon line
    #[arg(long, default_value_t = false)]
    pub(crate) no_horizon: bool,

    /// Print phase, distance and libration below the drawing
    #[arg(long, default_value_t = false)]
    pub(crate) info: bool,

    /// Step through time in the terminal instead of printing once
    #[arg(long, default_value_t = false)]
    pub(crate) animate: bool,

    /// Frames to animate (0 = until q is pressed)
    #[arg(long, default_value_t = 0)]
    pub(crate) frames: usize,

    /// Hours between animation frames (negative runs backwards)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) step_hours: Option<f64>,

    /// Animation frame rate cap
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Settings file to use instead of the per-user default
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Store --lat/--lon/--frame/--fps/--step-hours/--info as new defaults
    #[arg(long, default_value_t = false)]
    pub(crate) save_settings: bool,
}

/// Everything one run needs, after merging flags over settings.
#[derive(Clone, Debug)]
pub(crate) struct RunConfig {
    pub(crate) at: DateTime<Utc>,
    pub(crate) location: Option<ObserverLocation>,
    pub(crate) options: RenderOptions,
    pub(crate) show_info: bool,
    pub(crate) animate: bool,
    pub(crate) frames: usize,
    pub(crate) step_hours: f64,
    pub(crate) fps: u32,
}

impl Cli {
    pub(crate) fn resolve(&self, settings: &Settings) -> Result<RunConfig, MoonError> {
        let at = match &self.date {
            Some(s) => parse_utc(s)?,
            None => Utc::now(),
        };
        let location = ObserverLocation::from_parts(
            self.lat.or(settings.latitude),
            self.lon.or(settings.longitude),
        )?;
        Ok(RunConfig {
            at,
            location,
            options: RenderOptions {
                show_horizon: settings.show_horizon && !self.no_horizon,
                frame: self.frame.or(settings.frame),
            },
            show_info: self.info || settings.show_info,
            animate: self.animate,
            frames: self.frames,
            step_hours: self.step_hours.unwrap_or(settings.step_hours),
            fps: self.fps.unwrap_or(settings.fps).clamp(1, 60),
        })
    }

    /// Copies the persistable flags onto `settings`.
    pub(crate) fn apply_to(&self, settings: &mut Settings) {
        if self.lat.is_some() || self.lon.is_some() {
            settings.latitude = self.lat;
            settings.longitude = self.lon;
        }
        if self.frame.is_some() {
            settings.frame = self.frame;
        }
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if let Some(step) = self.step_hours {
            settings.step_hours = step;
        }
        if self.no_horizon {
            settings.show_horizon = false;
        }
        if self.info {
            settings.show_info = true;
        }
    }
}

pub(crate) fn parse_utc(s: &str) -> Result<DateTime<Utc>, MoonError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| MoonError::InvalidDate(s.to_string()))
}

//! Lunar disc rendering: texture selection, illumination, compositing and
//! reprojection into a fixed-size character frame.

pub mod catalog;
pub mod compose;
pub mod geometry;
pub mod horizon;
pub mod illumination;
pub mod rotate;

use crate::model::{Frame, MoonPhysicalState, RenderOptions};
use tracing::debug;

pub use catalog::{TextureCatalog, TextureCatalogEntry};
pub use geometry::{disc_geometry, DiscGeometry};
pub use illumination::{lit_intensity, lit_mask, phase_sun_vector, LitMask, SunVector};
pub use rotate::rotate_raster;

pub const FRAME_WIDTH: usize = 60;
pub const FRAME_HEIGHT: usize = 29;

/// Frame cell the disc center is pinned to; rotation and the horizon use it too.
pub const FRAME_CENTER_X: usize = FRAME_WIDTH / 2;
pub const FRAME_CENTER_Y: usize = FRAME_HEIGHT / 2;

/// Extra clockwise turn applied on top of the parallactic angle so the
/// catalog's north-up textures line up with the observer's zenith.
pub const TEXTURE_ORIENTATION_OFFSET_DEG: f64 = 0.0;

const FLIPPED_FRAME_DEG: f64 = 180.0;

pub(crate) fn is_blank(ch: char) -> bool {
    ch.is_whitespace()
}

/// Rectangular character raster, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharGrid {
    w: usize,
    h: usize,
    cells: Vec<char>,
}

impl CharGrid {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            cells: vec![' '; w * h],
        }
    }

    /// Parses newline-separated rows; short rows are padded with blanks.
    pub fn from_text(text: &str) -> Self {
        let rows: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        let w = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Self::new(w, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                grid.set(x, y, ch);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    /// Signed lookup so callers can probe outside the grid.
    pub fn get(&self, x: i64, y: i64) -> Option<char> {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return None;
        }
        Some(self.cells[self.idx(x as usize, y as usize)])
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = ch;
        }
    }

    pub fn row(&self, y: usize) -> &[char] {
        let start = y * self.w;
        &self.cells[start..start + self.w]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> + '_ {
        (0..self.h).map(move |y| self.row(y))
    }

    pub fn fill_row(&mut self, y: usize, text: &str) {
        for (x, ch) in text.chars().take(self.w).enumerate() {
            self.set(x, y, ch);
        }
    }

    pub fn non_blank_count(&self) -> usize {
        self.cells.iter().filter(|&&c| !is_blank(c)).count()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.w + 1) * self.h);
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                out.push('\n');
            }
            out.extend(row.iter());
        }
        out
    }
}

/// Renders with the catalog bundled into the binary.
pub fn render(state: &MoonPhysicalState, options: &RenderOptions) -> String {
    render_with_catalog(TextureCatalog::embedded(), state, options)
}

pub fn render_with_catalog(
    catalog: &TextureCatalog,
    state: &MoonPhysicalState,
    options: &RenderOptions,
) -> String {
    render_grid(catalog, state, options).to_text()
}

/// Full pipeline: nearest texture, lit mask, composite in the celestial
/// frame, reprojection, then the horizon overlay whenever an observer
/// position is known.
pub fn render_grid(
    catalog: &TextureCatalog,
    state: &MoonPhysicalState,
    options: &RenderOptions,
) -> CharGrid {
    let entry = catalog.nearest(state.distance_km, state.libration);
    debug!(
        index = entry.index,
        distance_km = entry.distance_km,
        elat = entry.libration.elat_deg,
        elon = entry.libration.elon_deg,
        "selected texture"
    );

    let texture = entry.raster();
    let geometry = disc_geometry(texture);
    let sun = phase_sun_vector(
        state.phase_angle_deg,
        state.limb,
        state.libration.elat_deg,
    );
    let mask = lit_mask(&geometry, &sun, state.illuminated_fraction);
    let celestial = compose::composite(texture, &geometry, &mask);

    let center = Some((FRAME_CENTER_X as f64, FRAME_CENTER_Y as f64));
    let mut frame = match (options.resolve_frame(state.position.as_ref()), state.position) {
        (Frame::CelestialDown, _) => rotate_raster(&celestial, FLIPPED_FRAME_DEG, center),
        (Frame::Observer, Some(pos)) => {
            let angle = pos.parallactic_angle_deg + TEXTURE_ORIENTATION_OFFSET_DEG;
            rotate_raster(&celestial, angle, center)
        }
        _ => celestial,
    };

    if let Some(pos) = state.position.filter(|_| options.show_horizon) {
        horizon::overlay_horizon(
            &mut frame,
            &geometry,
            pos.altitude_deg,
            state.angular_diameter_deg,
        );
    }
    frame
}

//! Lambertian lighting of the lunar disc.
//!
//! Screen convention: x grows to the right, y grows downward, z points at the
//! viewer. Position angles run from celestial north (up, -y) through east
//! (left, -x).

use super::{DiscGeometry, FRAME_HEIGHT, FRAME_WIDTH};
use crate::model::LimbSource;
use tracing::debug;

/// Limb position angle standing in for the bright limb of a waxing Moon.
pub const WAXING_LIMB_ANGLE_DEG: f64 = 270.0;
/// Limb position angle standing in for the bright limb of a waning Moon.
pub const WANING_LIMB_ANGLE_DEG: f64 = 90.0;

/// Averaged intensity above which a cell counts as lit.
pub const LIT_EPSILON: f64 = 1e-6;

/// Sub-cell sample offsets, in cell widths, along each axis.
const SAMPLE_OFFSETS: [f64; 5] = [-0.5, -0.25, 0.0, 0.25, 0.5];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SunVector {
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn dot(&self, x: f64, y: f64, z: f64) -> f64 {
        x * self.x + y * self.y + z * self.z
    }
}

/// Unit vector toward the Sun as seen from the disc.
pub fn phase_sun_vector(
    phase_angle_deg: f64,
    limb: LimbSource,
    libration_lat_deg: f64,
) -> SunVector {
    let limb_angle = match limb {
        LimbSource::BrightLimb(angle) => angle,
        LimbSource::Waxing(true) => WAXING_LIMB_ANGLE_DEG,
        LimbSource::Waxing(false) => WANING_LIMB_ANGLE_DEG,
    }
    .to_radians();

    let alpha = phase_angle_deg.to_radians();
    let x = -limb_angle.sin() * alpha.sin();
    let y = -limb_angle.cos() * alpha.sin();
    let z = alpha.cos();

    let (s, c) = libration_lat_deg.to_radians().sin_cos();
    let (y, z) = (y * c - z * s, y * s + z * c);

    // unit by construction; renormalise to shed rounding drift
    let len = (x * x + y * y + z * z).sqrt();
    SunVector {
        x: x / len,
        y: y / len,
        z: z / len,
    }
}

/// Signed incidence at a single disc point; not clamped.
fn incidence(x: f64, y: f64, sun: &SunVector) -> f64 {
    let nz = (1.0 - x * x - y * y).max(0.0).sqrt();
    sun.dot(x, y, nz)
}

/// Mean clamped Lambertian intensity over a 5×5 sub-grid of the cell at
/// `(xn, yn)`. Samples off the disc are skipped; a cell with none on the
/// disc is dark.
pub fn lit_intensity(xn: f64, yn: f64, cell_w: f64, cell_h: f64, sun: &SunVector) -> f64 {
    let mut total = 0.0;
    let mut samples = 0u32;
    for oy in SAMPLE_OFFSETS {
        let y = yn + oy * cell_h;
        for ox in SAMPLE_OFFSETS {
            let x = xn + ox * cell_w;
            if x * x + y * y > 1.0 {
                continue;
            }
            total += incidence(x, y, sun).max(0.0);
            samples += 1;
        }
    }
    if samples == 0 {
        0.0
    } else {
        total / samples as f64
    }
}

/// Frame-sized lit/unlit flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LitMask {
    w: usize,
    h: usize,
    cells: Vec<bool>,
}

impl LitMask {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            cells: vec![false; w * h],
        }
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h && self.cells[y * self.w + x]
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&lit| lit).count()
    }

    fn set(&mut self, x: usize, y: usize) {
        self.cells[y * self.w + x] = true;
    }
}

/// Lights every frame cell whose averaged intensity is positive. When the
/// crescent is too thin for any cell to qualify, the disc cells with the
/// highest centre incidence are lit instead, enough to cover the illuminated
/// fraction and at least one unless the fraction is zero.
pub fn lit_mask(geometry: &DiscGeometry, sun: &SunVector, illuminated_fraction: f64) -> LitMask {
    let (cell_w, cell_h) = geometry.cell_size();
    let mut mask = LitMask::new(FRAME_WIDTH, FRAME_HEIGHT);
    let mut disc_cells: Vec<(f64, usize, usize)> = Vec::new();

    for y in 0..FRAME_HEIGHT {
        for x in 0..FRAME_WIDTH {
            let (xn, yn) = geometry.normalize(x, y);
            if lit_intensity(xn, yn, cell_w, cell_h, sun) > LIT_EPSILON {
                mask.set(x, y);
            }
            if xn * xn + yn * yn <= 1.0 {
                disc_cells.push((incidence(xn, yn, sun), x, y));
            }
        }
    }

    if mask.lit_count() > 0 || illuminated_fraction <= 0.0 {
        return mask;
    }

    let wanted = ((illuminated_fraction * disc_cells.len() as f64).round() as usize).max(1);
    debug!(wanted, disc_cells = disc_cells.len(), "thin crescent, ranking disc cells");
    disc_cells.sort_by(|a, b| b.0.total_cmp(&a.0));
    for &(_, x, y) in disc_cells.iter().take(wanted) {
        mask.set(x, y);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sun_vector_is_unit_length() {
        for alpha in [0.0, 12.5, 45.0, 90.0, 133.0, 179.9, 180.0] {
            for limb in [
                LimbSource::Waxing(true),
                LimbSource::Waxing(false),
                LimbSource::BrightLimb(37.0),
            ] {
                for elat in [-6.5, 0.0, 4.2] {
                    let s = phase_sun_vector(alpha, limb, elat);
                    assert_abs_diff_eq!(s.norm(), 1.0, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn full_phase_points_at_viewer() {
        for limb in [
            LimbSource::Waxing(true),
            LimbSource::Waxing(false),
            LimbSource::BrightLimb(200.0),
        ] {
            let s = phase_sun_vector(0.0, limb, 0.0);
            assert_abs_diff_eq!(s.x, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(s.y, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(s.z, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn waxing_and_waning_mirror_in_x() {
        let wax = phase_sun_vector(100.0, LimbSource::Waxing(true), 0.0);
        let wan = phase_sun_vector(100.0, LimbSource::Waxing(false), 0.0);
        assert!(wax.x > 0.0);
        assert_abs_diff_eq!(wax.x, -wan.x, epsilon = 1e-12);
        assert_abs_diff_eq!(wax.z, wan.z, epsilon = 1e-12);
    }

    #[test]
    fn bright_limb_north_lights_top() {
        let s = phase_sun_vector(90.0, LimbSource::BrightLimb(0.0), 0.0);
        assert_abs_diff_eq!(s.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.y, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn libration_tilts_depth_into_vertical() {
        let s = phase_sun_vector(0.0, LimbSource::Waxing(true), 90.0);
        assert_abs_diff_eq!(s.y, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn intensity_front_and_back_lit() {
        let front = SunVector { x: 0.0, y: 0.0, z: 1.0 };
        let back = SunVector { x: 0.0, y: 0.0, z: -1.0 };
        let cell = 1.0 / 28.0;
        assert_abs_diff_eq!(lit_intensity(0.0, 0.0, cell, cell, &front), 1.0, epsilon = 1e-3);
        for (x, y) in [(0.0, 0.0), (0.3, -0.2), (-0.6, 0.5)] {
            assert_eq!(lit_intensity(x, y, cell, cell, &back), 0.0);
        }
    }

    #[test]
    fn cells_off_the_disc_are_dark() {
        let front = SunVector { x: 0.0, y: 0.0, z: 1.0 };
        assert_eq!(lit_intensity(2.0, 0.0, 0.05, 0.05, &front), 0.0);
    }

    #[test]
    fn new_moon_falls_back_to_ranked_cells() {
        let geometry = DiscGeometry {
            width: 51,
            height: 23,
            center_x: 30,
            center_y: 12,
        };
        let sun = phase_sun_vector(180.0, LimbSource::Waxing(true), 0.0);
        assert_eq!(lit_mask(&geometry, &sun, 0.0).lit_count(), 0);
        assert_eq!(lit_mask(&geometry, &sun, 1e-9).lit_count(), 1);

        let mask = lit_mask(&geometry, &sun, 0.01);
        assert!(mask.lit_count() > 1);
    }

    #[test]
    fn ranked_fallback_lights_the_rim() {
        let geometry = DiscGeometry {
            width: 51,
            height: 23,
            center_x: 30,
            center_y: 12,
        };
        let sun = phase_sun_vector(180.0, LimbSource::Waxing(false), 0.0);
        let mask = lit_mask(&geometry, &sun, 0.02);
        assert!(mask.lit_count() > 0);
        for y in 0..FRAME_HEIGHT {
            for x in 0..FRAME_WIDTH {
                if mask.is_lit(x, y) {
                    let (xn, yn) = geometry.normalize(x, y);
                    assert!(xn * xn + yn * yn > 0.8, "({x},{y}) lit away from the limb");
                }
            }
        }
    }
}

use super::{is_blank, CharGrid, FRAME_CENTER_X, FRAME_CENTER_Y, FRAME_HEIGHT, FRAME_WIDTH};

/// Bounding box of a texture's visible disc, in the texture's own cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscGeometry {
    pub width: usize,
    pub height: usize,
    pub center_x: usize,
    pub center_y: usize,
}

impl DiscGeometry {
    pub fn half_width(&self) -> f64 {
        self.width as f64 / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height as f64 / 2.0
    }

    /// Frame cell → disc-normalized coordinates (disc radius 1, y down).
    pub fn normalize(&self, frame_x: usize, frame_y: usize) -> (f64, f64) {
        (
            (frame_x as f64 - FRAME_CENTER_X as f64) / self.half_width(),
            (frame_y as f64 - FRAME_CENTER_Y as f64) / self.half_height(),
        )
    }

    /// One frame cell measured in disc-normalized units.
    pub fn cell_size(&self) -> (f64, f64) {
        (1.0 / self.half_width(), 1.0 / self.half_height())
    }

    /// Frame cell → texture cell, with the disc center pinned to the frame center.
    pub fn texture_cell(&self, frame_x: usize, frame_y: usize) -> (i64, i64) {
        (
            frame_x as i64 - FRAME_CENTER_X as i64 + self.center_x as i64,
            frame_y as i64 - FRAME_CENTER_Y as i64 + self.center_y as i64,
        )
    }
}

impl Default for DiscGeometry {
    fn default() -> Self {
        Self {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            center_x: FRAME_WIDTH / 2,
            center_y: FRAME_HEIGHT / 2,
        }
    }
}

/// Smallest rectangle holding every non-blank cell. Blank or empty rasters
/// get the whole frame.
pub fn disc_geometry(grid: &CharGrid) -> DiscGeometry {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;

    for (y, row) in grid.rows().enumerate() {
        let first = row.iter().position(|&c| !is_blank(c));
        let last = row.iter().rposition(|&c| !is_blank(c));
        if let (Some(first), Some(last)) = (first, last) {
            bounds = Some(match bounds {
                None => (first, last, y, y),
                Some((x0, x1, y0, _)) => (x0.min(first), x1.max(last), y0, y),
            });
        }
    }

    match bounds {
        Some((x0, x1, y0, y1)) => DiscGeometry {
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
            center_x: (x0 + x1) / 2,
            center_y: (y0 + y1) / 2,
        },
        None => DiscGeometry::default(),
    }
}

use super::CharGrid;

/// Width of a terminal character cell relative to its height (10:22).
pub const CELL_WIDTH: f64 = 10.0;
pub const CELL_HEIGHT: f64 = 22.0;

/// Rotations this close to zero return the input untouched.
pub const IDENTITY_TOLERANCE_DEG: f64 = 0.1;

/// Rotates `src` clockwise by `angle_deg` about `center` (default: the
/// geometric centre) into a raster of the same size.
///
/// Works in an aspect-corrected space where one row is `CELL_HEIGHT /
/// CELL_WIDTH` columns tall, and maps every destination cell back to its
/// nearest source cell, so no output cell is ever left unset.
pub fn rotate_raster(src: &CharGrid, angle_deg: f64, center: Option<(f64, f64)>) -> CharGrid {
    let turn = angle_deg.rem_euclid(360.0);
    if turn < IDENTITY_TOLERANCE_DEG || 360.0 - turn < IDENTITY_TOLERANCE_DEG {
        return src.clone();
    }

    let (w, h) = (src.width(), src.height());
    let (cx, cy) = center.unwrap_or(((w as f64 - 1.0) / 2.0, (h as f64 - 1.0) / 2.0));
    let aspect = CELL_HEIGHT / CELL_WIDTH;
    let (s, c) = angle_deg.to_radians().sin_cos();

    let mut out = CharGrid::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f64 - cx;
            let dy = (y as f64 - cy) * aspect;
            // inverse of the clockwise (y-down) rotation
            let sx = dx * c + dy * s;
            let sy = -dx * s + dy * c;
            let src_x = (cx + sx).round() as i64;
            let src_y = (cy + sy / aspect).round() as i64;
            if let Some(ch) = src.get(src_x, src_y) {
                out.set(x, y, ch);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(w: usize, h: usize, at: (usize, usize)) -> CharGrid {
        let mut g = CharGrid::new(w, h);
        g.set(at.0, at.1, '@');
        g
    }

    fn find(g: &CharGrid, ch: char) -> Vec<(i64, i64)> {
        let mut hits = Vec::new();
        for y in 0..g.height() {
            for x in 0..g.width() {
                if g.get(x as i64, y as i64) == Some(ch) {
                    hits.push((x as i64, y as i64));
                }
            }
        }
        hits
    }

    #[test]
    fn near_zero_angles_are_identity() {
        let g = CharGrid::from_text("ab c\n d e\nfgh ");
        for angle in [0.0, 0.05, -0.09, 360.0, 359.95] {
            assert_eq!(rotate_raster(&g, angle, None), g);
        }
    }

    #[test]
    fn half_turn_mirrors_offsets() {
        let (cx, cy) = (30usize, 14usize);
        let g = marked(60, 29, (cx + 9, cy - 4));
        let out = rotate_raster(&g, 180.0, Some((cx as f64, cy as f64)));
        let hits = find(&out, '@');
        assert!(!hits.is_empty());
        for (x, y) in hits {
            assert!((x - (cx as i64 - 9)).abs() <= 1, "x = {x}");
            assert!((y - (cy as i64 + 4)).abs() <= 1, "y = {y}");
        }
    }

    #[test]
    fn quarter_turn_is_clockwise_and_aspect_corrected() {
        // A point 11 columns right of centre is 5 rows tall once rotated a
        // quarter turn clockwise, since 11 * 10 / 22 = 5.
        let (cx, cy) = (30usize, 14usize);
        let g = marked(60, 29, (cx + 11, cy));
        let out = rotate_raster(&g, 90.0, Some((cx as f64, cy as f64)));
        let hits = find(&out, '@');
        assert!(!hits.is_empty());
        for (x, y) in hits {
            assert!((x - cx as i64).abs() <= 1, "x = {x}");
            assert!((y - (cy as i64 + 5)).abs() <= 1, "y = {y}");
        }
    }

    #[test]
    fn output_keeps_dimensions() {
        let g = CharGrid::from_text("####\n####\n####");
        let out = rotate_raster(&g, 33.0, None);
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 3);
    }
}

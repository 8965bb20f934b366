use super::{is_blank, CharGrid, DiscGeometry, LitMask, FRAME_HEIGHT, FRAME_WIDTH};

/// Keeps texture characters where the mask is lit, blank elsewhere. The
/// texture is re-centred so its disc sits on the frame centre whatever its
/// size; nearer moons simply cover more cells.
pub fn composite(texture: &CharGrid, geometry: &DiscGeometry, mask: &LitMask) -> CharGrid {
    let mut out = CharGrid::new(FRAME_WIDTH, FRAME_HEIGHT);
    for y in 0..FRAME_HEIGHT {
        for x in 0..FRAME_WIDTH {
            if !mask.is_lit(x, y) {
                continue;
            }
            let (tx, ty) = geometry.texture_cell(x, y);
            if let Some(ch) = texture.get(tx, ty).filter(|&c| !is_blank(c)) {
                out.set(x, y, ch);
            }
        }
    }
    out
}

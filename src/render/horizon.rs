use super::{CharGrid, DiscGeometry, FRAME_CENTER_Y};

const PAD: char = '-';

/// Overwrites the row at 0° altitude with a labelled horizon line whenever
/// any part of the disc is below the horizon.
pub fn overlay_horizon(
    frame: &mut CharGrid,
    geometry: &DiscGeometry,
    altitude_deg: f64,
    angular_diameter_deg: f64,
) {
    let radius = angular_diameter_deg / 2.0;
    if altitude_deg - radius >= 0.0 || frame.height() == 0 {
        return;
    }

    let row = horizon_row(geometry, altitude_deg, angular_diameter_deg, frame.height());
    let label = horizon_label(altitude_deg, radius, frame.width());
    frame.fill_row(row, &label);
}

/// Frame row sitting at 0° altitude, clamped into the frame.
pub(crate) fn horizon_row(
    geometry: &DiscGeometry,
    altitude_deg: f64,
    angular_diameter_deg: f64,
    frame_height: usize,
) -> usize {
    let last = frame_height.saturating_sub(1) as f64;
    let deg_per_row = angular_diameter_deg / geometry.height.max(1) as f64;
    let offset = if deg_per_row > 0.0 {
        altitude_deg / deg_per_row
    } else {
        altitude_deg.signum() * last
    };
    (FRAME_CENTER_Y as f64 + offset).round().clamp(0.0, last) as usize
}

/// `--horizon--` while the disc straddles the horizon, otherwise e.g.
/// `--12.5°-below-horizon--`, centred in dashes to exactly `width` chars.
pub(crate) fn horizon_label(altitude_deg: f64, angular_radius_deg: f64, width: usize) -> String {
    let words = if altitude_deg + angular_radius_deg > 0.0 {
        vec!["horizon".to_string()]
    } else {
        vec![
            format!("{}°", format_degrees(-altitude_deg)),
            "below".to_string(),
            "horizon".to_string(),
        ]
    };
    let label = format!("{PAD}{PAD}{}{PAD}{PAD}", words.join("-"));

    let len = label.chars().count();
    if len >= width {
        return label.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    let mut line = String::with_capacity(width + 2);
    line.extend(std::iter::repeat(PAD).take(left));
    line.push_str(&label);
    line.extend(std::iter::repeat(PAD).take(right));
    line
}

/// One decimal place, without a trailing ".0".
fn format_degrees(value: f64) -> String {
    let s = format!("{value:.1}");
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

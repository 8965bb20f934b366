//! Low-precision lunar and solar ephemeris.
//!
//! Truncated series from Meeus, *Astronomical Algorithms* (2nd ed.):
//! ch. 47 for the Moon, ch. 25 for the Sun, ch. 48 for phase and bright limb,
//! ch. 53 for optical libration and ch. 13/14 for horizontal coordinates.
//! Good to a few hundredths of a degree in position, plenty for choosing a
//! texture and lighting a 60-column disc.

use crate::model::{Libration, LimbSource, MoonPhysicalState, ObserverLocation, ObserverPosition};
use chrono::{DateTime, Utc};

const J2000: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const AU_KM: f64 = 149_597_870.7;
const MOON_RADIUS_KM: f64 = 1_737.4;
const EARTH_RADIUS_KM: f64 = 6_378.14;
/// Inclination of the mean lunar equator to the ecliptic.
const LUNAR_EQUATOR_INCLINATION_DEG: f64 = 1.542_42;

/// Source of Moon geometry for an instant and optional observer.
pub trait EphemerisProvider {
    fn moon_state(
        &self,
        at: DateTime<Utc>,
        observer: Option<ObserverLocation>,
    ) -> MoonPhysicalState;
}

/// Built-in analytic provider; no data files, no network.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowPrecisionEphemeris;

impl EphemerisProvider for LowPrecisionEphemeris {
    fn moon_state(
        &self,
        at: DateTime<Utc>,
        observer: Option<ObserverLocation>,
    ) -> MoonPhysicalState {
        let jd = julian_day(at);
        let t = (jd - J2000) / 36_525.0;

        let moon = moon_position(t);
        let sun = sun_position(t);
        let obliquity = 23.439_291 - 0.013_004_2 * t;
        let (moon_ra, moon_dec) = ecliptic_to_equatorial(moon.lon, moon.lat, obliquity);
        let (sun_ra, sun_dec) = ecliptic_to_equatorial(sun.lon, 0.0, obliquity);

        // ch. 48: geocentric elongation, then phase angle
        let cos_psi = moon.lat.to_radians().cos() * (moon.lon - sun.lon).to_radians().cos();
        let psi = cos_psi.clamp(-1.0, 1.0).acos();
        let sun_km = sun.distance_au * AU_KM;
        let phase = (sun_km * psi.sin()).atan2(moon.distance_km - sun_km * psi.cos());
        let illuminated_fraction = (1.0 + phase.cos()) / 2.0;
        let waxing = normalize_deg(moon.lon - sun.lon) < 180.0;

        let bright_limb = {
            let (d0, d) = (sun_dec.to_radians(), moon_dec.to_radians());
            let dra = (sun_ra - moon_ra).to_radians();
            let y = d0.cos() * dra.sin();
            let x = d0.sin() * d.cos() - d0.cos() * d.sin() * dra.cos();
            normalize_deg(y.atan2(x).to_degrees())
        };

        let libration = optical_libration(t, &moon);
        let angular_diameter_deg = 2.0 * (MOON_RADIUS_KM / moon.distance_km).asin().to_degrees();

        let position = observer.map(|loc| {
            horizontal_position(jd, t, loc, moon_ra, moon_dec, moon.distance_km)
        });

        MoonPhysicalState {
            phase_angle_deg: phase.to_degrees(),
            illuminated_fraction,
            waxing,
            limb: LimbSource::BrightLimb(bright_limb),
            distance_km: moon.distance_km,
            angular_diameter_deg,
            libration,
            position,
        }
    }
}

pub fn julian_day(at: DateTime<Utc>) -> f64 {
    let secs = at.timestamp() as f64 + f64::from(at.timestamp_subsec_millis()) / 1000.0;
    UNIX_EPOCH_JD + secs / 86_400.0
}

pub(crate) fn normalize_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

fn normalize_signed_deg(deg: f64) -> f64 {
    let d = normalize_deg(deg);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

fn sin_deg(d: f64) -> f64 {
    d.to_radians().sin()
}

fn cos_deg(d: f64) -> f64 {
    d.to_radians().cos()
}

struct MoonPosition {
    lon: f64,
    lat: f64,
    distance_km: f64,
    /// Argument of latitude, needed again for libration.
    f: f64,
}

struct SunPosition {
    lon: f64,
    distance_au: f64,
}

// (D, M, M', F, Σl [1e-6 deg], Σr [1e-3 km])
const LON_DIST_TERMS: [(i8, i8, i8, i8, f64, f64); 32] = [
    (0, 0, 1, 0, 6_288_774.0, -20_905_355.0),
    (2, 0, -1, 0, 1_274_027.0, -3_699_111.0),
    (2, 0, 0, 0, 658_314.0, -2_955_968.0),
    (0, 0, 2, 0, 213_618.0, -569_925.0),
    (0, 1, 0, 0, -185_116.0, 48_888.0),
    (0, 0, 0, 2, -114_332.0, -3_149.0),
    (2, 0, -2, 0, 58_793.0, 246_158.0),
    (2, -1, -1, 0, 57_066.0, -152_138.0),
    (2, 0, 1, 0, 53_322.0, -170_733.0),
    (2, -1, 0, 0, 45_758.0, -204_586.0),
    (0, 1, -1, 0, -40_923.0, -129_620.0),
    (1, 0, 0, 0, -34_720.0, 108_743.0),
    (0, 1, 1, 0, -30_383.0, 104_755.0),
    (2, 0, 0, -2, 15_327.0, 10_321.0),
    (0, 0, 1, 2, -12_528.0, 0.0),
    (0, 0, 1, -2, 10_980.0, 79_661.0),
    (4, 0, -1, 0, 10_675.0, -34_782.0),
    (0, 0, 3, 0, 10_034.0, -23_210.0),
    (4, 0, -2, 0, 8_548.0, -21_636.0),
    (2, 1, -1, 0, -7_888.0, 24_208.0),
    (2, 1, 0, 0, -6_766.0, 30_824.0),
    (1, 0, -1, 0, -5_163.0, -8_379.0),
    (1, 1, 0, 0, 4_987.0, -16_675.0),
    (2, -1, 1, 0, 4_036.0, -12_831.0),
    (2, 0, 2, 0, 3_994.0, -10_445.0),
    (4, 0, 0, 0, 3_861.0, -11_650.0),
    (2, 0, -3, 0, 3_665.0, 14_403.0),
    (0, 1, -2, 0, -2_689.0, -7_003.0),
    (2, 0, -1, 2, -2_602.0, 0.0),
    (2, -1, -2, 0, 2_390.0, 10_056.0),
    (1, 0, 1, 0, -2_348.0, 6_322.0),
    (2, -2, 0, 0, 2_236.0, -9_884.0),
];

// (D, M, M', F, Σb [1e-6 deg])
const LAT_TERMS: [(i8, i8, i8, i8, f64); 15] = [
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
];

fn moon_position(t: f64) -> MoonPosition {
    let lp = normalize_deg(218.316_447_7 + 481_267.881_234_21 * t);
    let d = normalize_deg(297.850_192_1 + 445_267.111_403_4 * t);
    let m = normalize_deg(357.529_109_2 + 35_999.050_290_9 * t);
    let mp = normalize_deg(134.963_396_4 + 477_198.867_505_5 * t);
    let f = normalize_deg(93.272_095_0 + 483_202.017_523_3 * t);
    let e = 1.0 - 0.002_516 * t;

    let a1 = 119.75 + 131.849 * t;
    let a2 = 53.09 + 479_264.290 * t;
    let a3 = 313.45 + 481_266.484 * t;

    let eccentricity = |mc: i8| match mc.abs() {
        1 => e,
        2 => e * e,
        _ => 1.0,
    };
    let arg = |cd: i8, cm: i8, cmp: i8, cf: i8| {
        f64::from(cd) * d + f64::from(cm) * m + f64::from(cmp) * mp + f64::from(cf) * f
    };

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(cd, cm, cmp, cf, l, r) in LON_DIST_TERMS.iter() {
        let a = arg(cd, cm, cmp, cf);
        let k = eccentricity(cm);
        sum_l += l * k * sin_deg(a);
        sum_r += r * k * cos_deg(a);
    }
    let mut sum_b = 0.0;
    for &(cd, cm, cmp, cf, b) in LAT_TERMS.iter() {
        sum_b += b * eccentricity(cm) * sin_deg(arg(cd, cm, cmp, cf));
    }

    sum_l += 3_958.0 * sin_deg(a1) + 1_962.0 * sin_deg(lp - f) + 318.0 * sin_deg(a2);
    sum_b += -2_235.0 * sin_deg(lp)
        + 382.0 * sin_deg(a3)
        + 175.0 * sin_deg(a1 - f)
        + 175.0 * sin_deg(a1 + f)
        + 127.0 * sin_deg(lp - mp)
        - 115.0 * sin_deg(lp + mp);

    MoonPosition {
        lon: normalize_deg(lp + sum_l / 1e6),
        lat: sum_b / 1e6,
        distance_km: 385_000.56 + sum_r / 1e3,
        f,
    }
}

fn sun_position(t: f64) -> SunPosition {
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = 357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t;
    let e = 0.016_708_634 - 0.000_042_037 * t;
    let c = (1.914_602 - 0.004_817 * t) * sin_deg(m)
        + (0.019_993 - 0.000_101 * t) * sin_deg(2.0 * m)
        + 0.000_289 * sin_deg(3.0 * m);
    let true_lon = l0 + c;
    let anomaly = m + c;
    let omega = 125.04 - 1_934.136 * t;

    SunPosition {
        lon: normalize_deg(true_lon - 0.005_69 - 0.004_78 * sin_deg(omega)),
        distance_au: 1.000_001_018 * (1.0 - e * e) / (1.0 + e * cos_deg(anomaly)),
    }
}

fn ecliptic_to_equatorial(lon: f64, lat: f64, obliquity: f64) -> (f64, f64) {
    let (l, b, eps) = (lon.to_radians(), lat.to_radians(), obliquity.to_radians());
    let ra = (l.sin() * eps.cos() - b.tan() * eps.sin()).atan2(l.cos());
    let dec = (b.sin() * eps.cos() + b.cos() * eps.sin() * l.sin()).asin();
    (normalize_deg(ra.to_degrees()), dec.to_degrees())
}

fn optical_libration(t: f64, moon: &MoonPosition) -> Libration {
    let omega = 125.044_547_9 - 1_934.136_289_1 * t;
    let i = LUNAR_EQUATOR_INCLINATION_DEG.to_radians();
    let w = (moon.lon - omega).to_radians();
    let b = moon.lat.to_radians();

    let a = (w.sin() * b.cos() * i.cos() - b.sin() * i.sin()).atan2(w.cos() * b.cos());
    let elon = normalize_signed_deg(a.to_degrees() - moon.f);
    let elat = (-w.sin() * b.cos() * i.sin() - b.sin() * i.cos()).asin().to_degrees();

    Libration {
        elon_deg: elon,
        elat_deg: elat,
    }
}

fn horizontal_position(
    jd: f64,
    t: f64,
    loc: ObserverLocation,
    ra: f64,
    dec: f64,
    distance_km: f64,
) -> ObserverPosition {
    let gmst = 280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    let hour_angle = normalize_deg(gmst + loc.longitude_deg - ra).to_radians();
    let phi = loc.latitude_deg.to_radians();
    let delta = dec.to_radians();

    let geo_alt = (phi.sin() * delta.sin() + phi.cos() * delta.cos() * hour_angle.cos()).asin();
    let parallax = (EARTH_RADIUS_KM / distance_km).asin();
    let altitude = geo_alt - parallax * geo_alt.cos();

    let azimuth = hour_angle
        .sin()
        .atan2(hour_angle.cos() * phi.sin() - delta.tan() * phi.cos());
    let parallactic = hour_angle
        .sin()
        .atan2(phi.tan() * delta.cos() - delta.sin() * hour_angle.cos());

    ObserverPosition {
        altitude_deg: altitude.to_degrees(),
        // Meeus measures azimuth from the south
        azimuth_deg: normalize_deg(azimuth.to_degrees() + 180.0),
        parallactic_angle_deg: parallactic.to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    #[test]
    fn julian_day_of_j2000() {
        let at = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_abs_diff_eq!(julian_day(at), J2000, epsilon = 1e-9);
    }

    #[test]
    fn meeus_example_47a() {
        // 1992 April 12, 0h TD: λ = 133.162655, β = -3.229126, Δ = 368409.7 km
        let jd = 2_448_724.5;
        let t = (jd - J2000) / 36_525.0;
        let moon = moon_position(t);
        assert_abs_diff_eq!(moon.lon, 133.162_655, epsilon = 0.05);
        assert_abs_diff_eq!(moon.lat, -3.229_126, epsilon = 0.02);
        assert_abs_diff_eq!(moon.distance_km, 368_409.7, epsilon = 150.0);
    }

    #[test]
    fn meeus_example_25a() {
        // 1992 October 13, 0h TD: apparent λ☉ = 199.90988, R = 0.99766 AU
        let t = -0.072_183_436;
        let sun = sun_position(t);
        assert_abs_diff_eq!(sun.lon, 199.909_88, epsilon = 0.01);
        assert_abs_diff_eq!(sun.distance_au, 0.997_66, epsilon = 1e-4);
    }

    #[test]
    fn full_and_new_moon_phases() {
        let eph = LowPrecisionEphemeris;
        // Full moon 2024-01-25 17:54 UTC, new moon 2024-01-11 11:57 UTC.
        let full = eph.moon_state(Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap(), None);
        assert!(full.illuminated_fraction > 0.99, "{}", full.illuminated_fraction);
        assert!(full.phase_angle_deg < 12.0);

        let new = eph.moon_state(Utc.with_ymd_and_hms(2024, 1, 11, 11, 57, 0).unwrap(), None);
        assert!(new.illuminated_fraction < 0.01, "{}", new.illuminated_fraction);
        assert!(new.phase_angle_deg > 168.0);
    }

    #[test]
    fn waxing_crescent_has_western_bright_limb() {
        // Three days after the 2024-01-11 new moon the Sun lies to the west,
        // so the bright limb's position angle is near 270°.
        let eph = LowPrecisionEphemeris;
        let s = eph.moon_state(Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap(), None);
        assert!(s.waxing);
        let LimbSource::BrightLimb(limb) = s.limb else {
            panic!("low-precision ephemeris always supplies the bright limb");
        };
        assert!((200.0..340.0).contains(&limb), "bright limb at {limb}");
    }

    #[test]
    fn state_stays_in_physical_envelope() {
        let eph = LowPrecisionEphemeris;
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        for day in 0..400 {
            let at = start + chrono::Duration::days(day);
            let s = eph.moon_state(at, None);
            assert!((356_000.0..407_000.0).contains(&s.distance_km), "{}", s.distance_km);
            assert!((0.48..0.57).contains(&s.angular_diameter_deg));
            assert!(s.libration.elon_deg.abs() < 8.5);
            assert!(s.libration.elat_deg.abs() < 7.5);
            assert!((0.0..=1.0).contains(&s.illuminated_fraction));
            assert!((0.0..=180.0).contains(&s.phase_angle_deg));
            assert!(s.position.is_none());
        }
    }

    #[test]
    fn observer_position_is_reported() {
        let eph = LowPrecisionEphemeris;
        let loc = ObserverLocation::new(51.48, 0.0).unwrap();
        let s = eph.moon_state(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(), Some(loc));
        let pos = s.position.unwrap();
        assert!((-90.0..=90.0).contains(&pos.altitude_deg));
        assert!((0.0..360.0).contains(&pos.azimuth_deg));
        assert!((-180.0..=180.0).contains(&pos.parallactic_angle_deg));
    }
}

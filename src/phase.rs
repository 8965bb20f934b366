use std::fmt;

/// Below this illuminated fraction the Moon is called new.
pub const NEW_MOON_FRACTION: f64 = 0.01;
/// Above this illuminated fraction the Moon is called full.
pub const FULL_MOON_FRACTION: f64 = 0.99;
/// Half-width of the band around 50% lit that counts as a quarter.
pub const QUARTER_FRACTION_EPSILON: f64 = 0.03;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseName {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseName {
    pub fn classify(illuminated_fraction: f64, waxing: bool) -> Self {
        let f = illuminated_fraction;
        if f < NEW_MOON_FRACTION {
            return PhaseName::New;
        }
        if f > FULL_MOON_FRACTION {
            return PhaseName::Full;
        }
        let quarter = (f - 0.5).abs() <= QUARTER_FRACTION_EPSILON;
        match (waxing, quarter, f < 0.5) {
            (true, true, _) => PhaseName::FirstQuarter,
            (false, true, _) => PhaseName::LastQuarter,
            (true, false, true) => PhaseName::WaxingCrescent,
            (true, false, false) => PhaseName::WaxingGibbous,
            (false, false, true) => PhaseName::WaningCrescent,
            (false, false, false) => PhaseName::WaningGibbous,
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseName::New => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::Full => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        };
        f.write_str(s)
    }
}

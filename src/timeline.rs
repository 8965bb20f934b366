use chrono::{DateTime, Duration, Utc};

/// Finite run of instants `start, start + step, ...`, `count` long.
/// Cloning or calling [`DateSteps::restart`] replays it from the start.
#[derive(Clone, Debug)]
pub struct DateSteps {
    start: DateTime<Utc>,
    step: Duration,
    count: usize,
    emitted: usize,
}

impl DateSteps {
    pub fn new(start: DateTime<Utc>, step: Duration, count: usize) -> Self {
        Self {
            start,
            step,
            count,
            emitted: 0,
        }
    }

    /// Step given in (possibly fractional) hours.
    pub fn hourly(start: DateTime<Utc>, step_hours: f64, count: usize) -> Self {
        let millis = (step_hours * 3_600_000.0).round() as i64;
        Self::new(start, Duration::milliseconds(millis), count)
    }

    pub fn restart(&mut self) {
        self.emitted = 0;
    }
}

impl Iterator for DateSteps {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= self.count {
            return None;
        }
        let n = i32::try_from(self.emitted).ok()?;
        self.emitted += 1;
        self.start.checked_add_signed(self.step * n)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.emitted;
        (0, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn steps_and_restarts() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut steps = DateSteps::hourly(start, 6.0, 3);
        let first: Vec<_> = steps.by_ref().collect();
        assert_eq!(
            first,
            vec![
                start,
                Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            ]
        );
        assert_eq!(steps.next(), None);

        steps.restart();
        assert_eq!(steps.count(), 3);
    }

    #[test]
    fn negative_steps_walk_backwards() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let last = DateSteps::hourly(start, -24.0, 2).last().unwrap();
        assert_eq!(last, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }
}

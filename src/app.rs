use crate::cli::{Cli, RunConfig};
use crate::config::{default_settings_path, load_settings, save_settings_atomic};
use crate::term::{quit_requested, Terminal};
use chrono::{DateTime, Utc};
use moonascii::{
    render, DateSteps, EphemerisProvider, LowPrecisionEphemeris, MoonPhysicalState, PhaseName,
};
use std::time::{Duration, Instant};
use tracing::info;

pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_path = match &cli.config {
        Some(p) => p.clone(),
        None => default_settings_path()?,
    };
    let mut settings = load_settings(&settings_path);
    if cli.save_settings {
        cli.apply_to(&mut settings);
        save_settings_atomic(&settings_path, &settings)?;
        info!(path = %settings_path.display(), "saved settings");
    }

    let run = cli.resolve(&settings)?;
    let ephemeris = LowPrecisionEphemeris;
    if run.animate {
        animate(&run, &ephemeris)
    } else {
        let state = ephemeris.moon_state(run.at, run.location);
        println!("{}", frame_lines(&run, run.at, &state).join("\n"));
        Ok(())
    }
}

fn frame_lines(run: &RunConfig, at: DateTime<Utc>, state: &MoonPhysicalState) -> Vec<String> {
    let mut lines: Vec<String> = render(state, &run.options).lines().map(str::to_owned).collect();
    if run.show_info {
        lines.push(String::new());
        lines.extend(info_lines(at, state));
    }
    lines
}

/// Human-readable summary printed under the drawing.
pub(crate) fn info_lines(at: DateTime<Utc>, state: &MoonPhysicalState) -> Vec<String> {
    let phase = PhaseName::classify(state.illuminated_fraction, state.waxing);
    let mut out = vec![
        format!("{}", at.format("%Y-%m-%d %H:%M UTC")),
        format!("{} ({:.0}% lit)", phase, state.illuminated_fraction * 100.0),
        format!(
            "distance {:.0} km, apparent diameter {:.3}°",
            state.distance_km, state.angular_diameter_deg
        ),
        format!(
            "libration lat {:+.2}° lon {:+.2}°",
            state.libration.elat_deg, state.libration.elon_deg
        ),
    ];
    if let Some(pos) = state.position {
        out.push(format!(
            "altitude {:.1}° azimuth {:.1}° parallactic {:.1}°",
            pos.altitude_deg, pos.azimuth_deg, pos.parallactic_angle_deg
        ));
    }
    out
}

fn animate(run: &RunConfig, ephemeris: &impl EphemerisProvider) -> anyhow::Result<()> {
    let frame_dt = Duration::from_secs_f32(1.0 / run.fps as f32);
    let count = if run.frames == 0 { usize::MAX } else { run.frames };
    let steps = DateSteps::hourly(run.at, run.step_hours, count);
    info!(start = %run.at, step_hours = run.step_hours, fps = run.fps, "animation start");

    let mut term = Terminal::begin()?;
    let result = (|| -> anyhow::Result<usize> {
        let mut shown = 0;
        for at in steps {
            let started = Instant::now();
            let state = ephemeris.moon_state(at, run.location);
            term.present(&frame_lines(run, at, &state))?;
            shown += 1;
            if quit_requested(frame_dt)? {
                break;
            }
            spin_sleep(frame_dt, started);
        }
        Ok(shown)
    })();
    term.end()?;

    let shown = result?;
    info!(frames = shown, "animation stop");
    Ok(())
}

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        if end - t > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

//! Drift offsets as a function of time.
//!
//! Two strategies produce `(dx, dy)` pixel offsets: a noise-driven one that walks a
//! seeded 2D field along time, and a periodic one built from two phase-shifted sines.
//! The strategy is chosen once per run by [`build_motion`].

use std::f64::consts::TAU;

use crate::config::{Amplitude, DriftConfig, MotionSpec};
use crate::foundation::core::Vec2;
use crate::foundation::error::{DriftError, DriftResult};
use crate::noise::NoiseSource;

/// Floor applied to the noise timescale before inverting it.
pub const EPSILON_TIMESCALE: f64 = 1e-6;
/// Floor applied to the duration before normalizing time.
pub const EPSILON_DURATION: f64 = 1e-9;

/// Offset added to the noise x-coordinate for the y axis.
const NOISE_Y_AXIS_SHIFT: f64 = 100.0;
/// Noise y-coordinate sampled for the y axis.
const NOISE_Y_AXIS_ROW: f64 = 33.33;
/// Phase (radians) of the y-axis sine relative to the x-axis sine.
const SINE_Y_PHASE: f64 = 1.7;

/// Noise-driven offsets at `t_secs`.
///
/// Both axes read the same field at disjoint coordinates so they move independently.
pub fn noise_offsets(noise: &NoiseSource, t_secs: f64, amp: Amplitude, timescale_secs: f64) -> Vec2 {
    let freq = 1.0 / timescale_secs.max(EPSILON_TIMESCALE);
    let u = t_secs * freq;
    let nx = noise.noise2d(u, 0.0);
    let ny = noise.noise2d(u + NOISE_Y_AXIS_SHIFT, NOISE_Y_AXIS_ROW);
    Vec2::new(nx * amp.x, ny * amp.y)
}

/// Periodic offsets at `t_secs` for a clip of `duration_secs`.
pub fn sine_offsets(
    t_secs: f64,
    duration_secs: f64,
    amp: Amplitude,
    cycles_x: f64,
    cycles_y: f64,
) -> Vec2 {
    let t_norm = t_secs / duration_secs.max(EPSILON_DURATION);
    let dx = (TAU * (t_norm * cycles_x)).sin() * amp.x;
    let dy = (TAU * (t_norm * cycles_y) + SINE_Y_PHASE).sin() * amp.y;
    Vec2::new(dx, dy)
}

/// A motion strategy evaluated per frame.
pub trait MotionModel {
    /// Pixel offset at `t_secs` seconds into the clip.
    fn offset_at(&self, t_secs: f64) -> Vec2;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Noise-driven drift over a borrowed [`NoiseSource`].
#[derive(Clone, Copy, Debug)]
pub struct NoiseMotion<'a> {
    pub noise: &'a NoiseSource,
    pub amp: Amplitude,
    pub timescale_secs: f64,
}

impl MotionModel for NoiseMotion<'_> {
    fn offset_at(&self, t_secs: f64) -> Vec2 {
        noise_offsets(self.noise, t_secs, self.amp, self.timescale_secs)
    }

    fn name(&self) -> &'static str {
        "noise"
    }
}

/// Sine-driven drift over a fixed duration.
#[derive(Clone, Copy, Debug)]
pub struct PeriodicMotion {
    pub duration_secs: f64,
    pub amp: Amplitude,
    pub cycles_x: f64,
    pub cycles_y: f64,
}

impl MotionModel for PeriodicMotion {
    fn offset_at(&self, t_secs: f64) -> Vec2 {
        sine_offsets(
            t_secs,
            self.duration_secs,
            self.amp,
            self.cycles_x,
            self.cycles_y,
        )
    }

    fn name(&self) -> &'static str {
        "sine"
    }
}

/// No drift at all; used for the preview frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct StillMotion;

impl MotionModel for StillMotion {
    fn offset_at(&self, _t_secs: f64) -> Vec2 {
        Vec2::ZERO
    }

    fn name(&self) -> &'static str {
        "still"
    }
}

/// Select the configured strategy.
///
/// Noise mode borrows `noise`, which must be present.
pub fn build_motion<'a>(
    cfg: &DriftConfig,
    noise: Option<&'a NoiseSource>,
) -> DriftResult<Box<dyn MotionModel + 'a>> {
    match cfg.motion {
        MotionSpec::Noise {
            amp,
            timescale_secs,
        } => {
            let noise = noise.ok_or_else(|| {
                DriftError::generation("noise motion requires a noise source (bug)")
            })?;
            Ok(Box::new(NoiseMotion {
                noise,
                amp,
                timescale_secs,
            }))
        }
        MotionSpec::Periodic {
            amp,
            cycles_x,
            cycles_y,
        } => Ok(Box::new(PeriodicMotion {
            duration_secs: cfg.duration_secs,
            amp,
            cycles_x,
            cycles_y,
        })),
    }
}

#[cfg(test)]
#[path = "../tests/unit/motion.rs"]
mod tests;

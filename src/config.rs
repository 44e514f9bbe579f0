//! Run configuration.
//!
//! All parameters are resolved once into an immutable [`DriftConfig`] and passed by
//! reference into every component. Values come from named parameters (the process
//! environment by default) with the documented defaults below.

use std::path::PathBuf;
use std::str::FromStr;

use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{DriftError, DriftResult};
use crate::render::frame;

/// Default source image path.
pub const DEFAULT_INPUT_IMAGE: &str = "input/image.png";
/// Default output root.
pub const DEFAULT_OUTPUT_DIR: &str = "output";
/// Default output filename stem.
pub const DEFAULT_BASENAME: &str = "testframe";

/// Output locations for the preview, the frame sequence and the encoded video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OutputPaths {
    /// Root directory; holds the preview and the run manifest.
    pub output_dir: PathBuf,
    /// Directory receiving the numbered PNG sequence.
    pub frames_dir: PathBuf,
    /// Directory receiving the encoded video.
    pub final_dir: PathBuf,
}

impl OutputPaths {
    /// Derive `frames/` and `final/` under `output_dir`.
    pub fn under(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            frames_dir: output_dir.join("frames"),
            final_dir: output_dir.join("final"),
            output_dir,
        }
    }
}

/// How the source image is resized before compositing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScaleSpec {
    /// Resize to this exact width, preserving aspect ratio.
    TargetWidth(u32),
    /// Uniform scale factor applied to both axes.
    Factor(f64),
}

/// Undisplaced placement of the source image on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BasePlacement {
    /// Centered on the canvas, then shifted by the offsets.
    Centered { offset_x: i64, offset_y: i64 },
    /// Literal top-left coordinates.
    Explicit { x: i64, y: i64 },
}

/// Maximum drift per axis, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Amplitude {
    pub x: f64,
    pub y: f64,
}

/// Motion strategy and its parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MotionSpec {
    /// Seeded 2D noise sampled along time.
    Noise {
        amp: Amplitude,
        /// Seconds per unit of noise space; larger is slower.
        timescale_secs: f64,
    },
    /// Sine waves with a fixed number of cycles over the full duration.
    Periodic {
        amp: Amplitude,
        cycles_x: f64,
        cycles_y: f64,
    },
}

impl MotionSpec {
    /// Amplitude of either variant.
    pub fn amplitude(&self) -> Amplitude {
        match *self {
            Self::Noise { amp, .. } | Self::Periodic { amp, .. } => amp,
        }
    }
}

/// Fully resolved, immutable run configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DriftConfig {
    pub input_image: PathBuf,
    pub paths: OutputPaths,
    pub basename: String,
    pub canvas: Canvas,
    pub duration_secs: f64,
    pub fps: u32,
    pub total_frames: u64,
    pub scale: ScaleSpec,
    pub base: BasePlacement,
    pub motion: MotionSpec,
    /// Explicit noise seed; `None` draws one at run start.
    pub seed: Option<u32>,
    pub ffmpeg_bin: String,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            input_image: PathBuf::from(DEFAULT_INPUT_IMAGE),
            paths: OutputPaths::under(DEFAULT_OUTPUT_DIR),
            basename: DEFAULT_BASENAME.to_string(),
            canvas: Canvas {
                width: 1080,
                height: 1920,
            },
            duration_secs: 30.0,
            fps: 30,
            total_frames: 900,
            scale: ScaleSpec::Factor(0.65),
            base: BasePlacement::Centered {
                offset_x: 0,
                offset_y: 0,
            },
            motion: MotionSpec::Noise {
                amp: Amplitude { x: 18.0, y: 12.0 },
                timescale_secs: 12.0,
            },
            seed: None,
            ffmpeg_bin: "ffmpeg".to_string(),
        }
    }
}

impl DriftConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> DriftResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary name lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DriftResult<Self> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let output_dir = get("OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());
        let mut paths = OutputPaths::under(&output_dir);
        if let Some(v) = get("FRAMES_DIR") {
            paths.frames_dir = PathBuf::from(v);
        }
        if let Some(v) = get("FINAL_DIR") {
            paths.final_dir = PathBuf::from(v);
        }

        let width = positive_u32("OUT_W", parse_or(&get, "OUT_W", 1080i64)?)?;
        let height = positive_u32("OUT_H", parse_or(&get, "OUT_H", 1920i64)?)?;

        let duration_secs: f64 = parse_or(&get, "DURATION_SECONDS", 30.0)?;
        let fps = positive_u32("FPS", parse_or(&get, "FPS", 30i64)?)?;
        let total_frames = match parse_opt::<i64>(&get, "TOTAL_FRAMES")? {
            Some(v) if v <= 0 => {
                return Err(DriftError::config(format!(
                    "TOTAL_FRAMES must be > 0, got {v}"
                )));
            }
            Some(v) => v as u64,
            None => {
                let derived = (duration_secs * f64::from(fps)).round();
                if !derived.is_finite() || derived < 1.0 {
                    return Err(DriftError::config(format!(
                        "DURATION_SECONDS * FPS must yield at least one frame, got {duration_secs} * {fps}"
                    )));
                }
                derived as u64
            }
        };

        let scale = match parse_opt::<i64>(&get, "TARGET_PIXEL_WIDTH")? {
            Some(w) => ScaleSpec::TargetWidth(positive_u32("TARGET_PIXEL_WIDTH", w)?),
            None => ScaleSpec::Factor(parse_or(&get, "SCALE", 0.65)?),
        };

        let base_mode = get("BASE_POS_MODE").unwrap_or_else(|| "center".to_string());
        let base = match base_mode.to_ascii_lowercase().as_str() {
            "center" | "centre" | "centered" => BasePlacement::Centered {
                offset_x: parse_or(&get, "BASE_CENTER_OFFSET_X", 0)?,
                offset_y: parse_or(&get, "BASE_CENTER_OFFSET_Y", 0)?,
            },
            "coords" | "explicit" => BasePlacement::Explicit {
                x: parse_or(&get, "BASE_X", 100)?,
                y: parse_or(&get, "BASE_Y", 200)?,
            },
            _ => {
                return Err(DriftError::config(format!(
                    "BASE_POS_MODE must be 'center' or 'coords', got '{base_mode}'"
                )));
            }
        };

        let amp = Amplitude {
            x: parse_or(&get, "AMP_X", 18.0)?,
            y: parse_or(&get, "AMP_Y", 12.0)?,
        };
        let motion_mode = get("MOTION_MODE").unwrap_or_else(|| "perlin".to_string());
        let motion = match motion_mode.to_ascii_lowercase().as_str() {
            "perlin" | "noise" => MotionSpec::Noise {
                amp,
                timescale_secs: parse_or(&get, "NOISE_TIMESCALE_SECONDS", 12.0)?,
            },
            "sine" => MotionSpec::Periodic {
                amp,
                cycles_x: parse_or(&get, "SINE_CYCLES_X", 0.6)?,
                cycles_y: parse_or(&get, "SINE_CYCLES_Y", 0.5)?,
            },
            _ => {
                return Err(DriftError::config(format!(
                    "MOTION_MODE must be 'perlin' or 'sine', got '{motion_mode}'"
                )));
            }
        };

        let cfg = Self {
            input_image: get("INPUT_IMAGE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_IMAGE)),
            paths,
            basename: get("BASENAME").unwrap_or_else(|| DEFAULT_BASENAME.to_string()),
            canvas: Canvas { width, height },
            duration_secs,
            fps,
            total_frames,
            scale,
            base,
            motion,
            seed: parse_opt(&get, "NOISE_SEED")?,
            ffmpeg_bin: get("FFMPEG_BIN").unwrap_or_else(|| "ffmpeg".to_string()),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every range invariant. Called by [`DriftConfig::from_lookup`]; call it yourself
    /// for configurations built in code.
    pub fn validate(&self) -> DriftResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(DriftError::config(format!(
                "OUT_W/OUT_H must be > 0, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            return Err(DriftError::config(format!(
                "DURATION_SECONDS must be a finite value > 0, got {}",
                self.duration_secs
            )));
        }
        if self.fps == 0 {
            return Err(DriftError::config("FPS must be > 0, got 0"));
        }
        if self.total_frames == 0 {
            return Err(DriftError::config("TOTAL_FRAMES must be > 0, got 0"));
        }
        match self.scale {
            ScaleSpec::TargetWidth(0) => {
                return Err(DriftError::config("TARGET_PIXEL_WIDTH must be > 0, got 0"));
            }
            ScaleSpec::Factor(s) if !(s.is_finite() && s > 0.0) => {
                return Err(DriftError::config(format!(
                    "SCALE must be a finite value > 0, got {s}"
                )));
            }
            _ => {}
        }
        let amp = self.motion.amplitude();
        if !amp.x.is_finite() || !amp.y.is_finite() {
            return Err(DriftError::config(format!(
                "AMP_X/AMP_Y must be finite, got ({}, {})",
                amp.x, amp.y
            )));
        }
        match self.motion {
            MotionSpec::Noise { timescale_secs, .. } if !timescale_secs.is_finite() => {
                return Err(DriftError::config(format!(
                    "NOISE_TIMESCALE_SECONDS must be finite, got {timescale_secs}"
                )));
            }
            MotionSpec::Periodic {
                cycles_x, cycles_y, ..
            } if !cycles_x.is_finite() || !cycles_y.is_finite() => {
                return Err(DriftError::config(format!(
                    "SINE_CYCLES_X/SINE_CYCLES_Y must be finite, got ({cycles_x}, {cycles_y})"
                )));
            }
            _ => {}
        }
        if self.basename.is_empty() || self.basename.contains(['/', '\\']) {
            return Err(DriftError::config(format!(
                "BASENAME must be a non-empty file stem, got '{}'",
                self.basename
            )));
        }
        Ok(())
    }

    /// Zero-padding width for frame numbers: `max(4, digits(total_frames))`.
    pub fn pad_width(&self) -> usize {
        frame::zero_pad_width(self.total_frames)
    }

    /// `<output_dir>/<basename>_preview.png`.
    pub fn preview_path(&self) -> PathBuf {
        self.paths
            .output_dir
            .join(format!("{}_preview.png", self.basename))
    }

    /// `<output_dir>/<basename>_run.json`.
    pub fn manifest_path(&self) -> PathBuf {
        self.paths
            .output_dir
            .join(format!("{}_run.json", self.basename))
    }

    /// Path of the sequence frame at 0-based `index`.
    pub fn frame_path(&self, index: FrameIndex) -> PathBuf {
        self.paths.frames_dir.join(frame::frame_file_name(
            &self.basename,
            index.one_based(),
            self.pad_width(),
        ))
    }
}

fn parse_opt<T>(get: &impl Fn(&str) -> Option<String>, name: &str) -> DriftResult<Option<T>>
where
    T: FromStr,
{
    match get(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            DriftError::config(format!(
                "invalid value for {name}: '{raw}' (expected {})",
                type_label::<T>()
            ))
        }),
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> DriftResult<T>
where
    T: FromStr,
{
    Ok(parse_opt(get, name)?.unwrap_or(default))
}

fn positive_u32(name: &str, v: i64) -> DriftResult<u32> {
    if v <= 0 {
        return Err(DriftError::config(format!("{name} must be > 0, got {v}")));
    }
    u32::try_from(v).map_err(|_| DriftError::config(format!("{name} is too large, got {v}")))
}

fn type_label<T>() -> &'static str {
    match std::any::type_name::<T>() {
        "u32" => "integer in 0..=4294967295",
        name if name.starts_with('f') => "number",
        name if name.starts_with('u') => "non-negative integer",
        _ => "integer",
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

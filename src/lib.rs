//! imagedrift turns one still image into a drifting, alpha-transparent clip.
//!
//! - Resolve a [`DriftConfig`] (usually from the environment)
//! - [`run`] it to write a preview and a numbered PNG sequence
//! - [`encode`] the sequence into a VP9 WebM with alpha via the system `ffmpeg`
#![forbid(unsafe_code)]

mod foundation;

/// Source image loading.
pub mod assets;
/// Run configuration.
pub mod config;
/// Sequence encoding.
pub mod encode;
/// Drift offsets.
pub mod motion;
/// Seeded noise.
pub mod noise;
/// Base placement.
pub mod placement;
/// Frame compositing and persistence.
pub mod render;
/// Sequence driver.
pub mod session;

pub use crate::foundation::core::{Canvas, FrameIndex, PastePosition, Vec2};
pub use crate::foundation::error::{DriftError, DriftResult};

pub use crate::assets::source::ScaledSource;
pub use crate::config::{Amplitude, BasePlacement, DriftConfig, MotionSpec, OutputPaths, ScaleSpec};
pub use crate::encode::ffmpeg::{EncodeOpts, EncodeOutcome, EncodePlan, encode};
pub use crate::motion::{MotionModel, noise_offsets, sine_offsets};
pub use crate::noise::NoiseSource;
pub use crate::placement::compute_base_position;
pub use crate::render::frame::zero_pad_width;
pub use crate::session::{DriftSession, FramePlan, RunMode, RunState, RunSummary, run};

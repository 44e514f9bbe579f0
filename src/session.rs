//! Sequence driver.
//!
//! A run moves through `Init -> Preview -> Generating -> Done`; any error moves it to
//! `Failed`. Preview-only runs stop after `Preview` without building a noise source.
//! Frames are rendered and persisted strictly in index order so an interrupted run
//! leaves a contiguous, usable prefix on disk.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::source::ScaledSource;
use crate::config::{DriftConfig, MotionSpec};
use crate::foundation::core::{FrameIndex, PastePosition, Vec2};
use crate::foundation::error::{DriftError, DriftResult};
use crate::motion::{MotionModel, StillMotion, build_motion};
use crate::noise::NoiseSource;
use crate::placement::{compute_base_position, paste_position};
use crate::render::frame::{frame_pattern, render_frame, render_preview, save_png_atomic};

/// Frames between progress log lines.
const PROGRESS_EVERY: u64 = 100;

/// What a run produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Preview plus the full frame sequence.
    Full,
    /// Preview only.
    PreviewOnly,
}

/// Driver state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Init,
    Preview,
    Generating,
    Done,
    Failed,
}

/// Fully computed placement of one frame, independent of any I/O.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePlan {
    pub index: FrameIndex,
    pub t_secs: f64,
    pub offset: Vec2,
    pub paste: PastePosition,
}

/// Result of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Resolved noise seed; `None` for sine motion and preview-only runs.
    pub seed: Option<u32>,
    pub preview_path: PathBuf,
    pub frames_written: u64,
    pub frames_dir: PathBuf,
}

#[derive(serde::Serialize)]
struct RunManifest<'a> {
    config: &'a DriftConfig,
    seed: Option<u32>,
    frames_written: u64,
    pad_width: usize,
    pattern: String,
    base_position: PastePosition,
    source_size: (u32, u32),
}

/// A prepared generation run: validated config, scaled source and base position.
pub struct DriftSession<'c> {
    cfg: &'c DriftConfig,
    source: ScaledSource,
    base: PastePosition,
    state: RunState,
}

impl<'c> DriftSession<'c> {
    /// Validate `cfg`, load and scale the source image, create output directories and
    /// compute the base position.
    ///
    /// Configuration problems (including a missing or unreadable input image) are
    /// reported before any directory is created.
    #[tracing::instrument(skip(cfg), fields(input = %cfg.input_image.display()))]
    pub fn prepare(cfg: &'c DriftConfig) -> DriftResult<Self> {
        cfg.validate()?;
        let source = ScaledSource::load(&cfg.input_image, cfg.scale)?;
        ensure_dirs(cfg)?;

        let base = compute_base_position(&cfg.base, cfg.canvas, source.width(), source.height());
        tracing::info!(
            canvas_w = cfg.canvas.width,
            canvas_h = cfg.canvas.height,
            image_w = source.width(),
            image_h = source.height(),
            base_x = base.x,
            base_y = base.y,
            "prepared source"
        );

        Ok(Self {
            cfg,
            source,
            base,
            state: RunState::Init,
        })
    }

    /// Current driver state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Undisplaced paste position.
    pub fn base_position(&self) -> PastePosition {
        self.base
    }

    /// The scaled source image shared by every frame.
    pub fn source(&self) -> &ScaledSource {
        &self.source
    }

    /// Timestamp, drift and paste position of frame `index` under `motion`.
    ///
    /// Depends only on the index, the config and the read-only motion state, so any
    /// frame can be recomputed alone.
    pub fn plan_frame(&self, motion: &dyn MotionModel, index: FrameIndex) -> FramePlan {
        let t_secs = index.timestamp_secs(self.cfg.duration_secs, self.cfg.total_frames);
        let offset = motion.offset_at(t_secs);
        FramePlan {
            index,
            t_secs,
            offset,
            paste: paste_position(self.base, offset),
        }
    }

    /// Render and persist the zero-offset preview.
    pub fn write_preview(&mut self) -> DriftResult<PathBuf> {
        self.transition(RunState::Preview);
        let plan = self.plan_frame(&StillMotion, FrameIndex(0));
        let path = self.cfg.preview_path();
        let img = render_preview(&self.source, self.cfg.canvas, plan.paste);
        if let Err(e) = save_png_atomic(&img, &path) {
            return self.fail(e);
        }
        tracing::info!(path = %path.display(), "preview written");
        Ok(path)
    }

    /// Render and persist frames `0..total_frames` in order. Returns the number written.
    ///
    /// The first failing frame aborts the sequence; frames already written stay on disk.
    pub fn generate(&mut self, motion: &dyn MotionModel) -> DriftResult<u64> {
        self.transition(RunState::Generating);
        let total = self.cfg.total_frames;
        tracing::info!(total, motion = motion.name(), "generating frames");

        for i in 0..total {
            let plan = self.plan_frame(motion, FrameIndex(i));
            let img = render_frame(&self.source, self.cfg.canvas, plan.paste);
            let path = self.cfg.frame_path(plan.index);
            if let Err(e) = save_png_atomic(&img, &path) {
                tracing::error!(frame = plan.index.one_based(), total, "frame write failed");
                return self.fail(e);
            }

            let written = plan.index.one_based();
            if written.is_multiple_of(PROGRESS_EVERY) || written == total {
                tracing::info!("wrote {written}/{total}");
            }
        }

        Ok(total)
    }

    fn write_manifest(&mut self, seed: Option<u32>, frames_written: u64) -> DriftResult<()> {
        let manifest = RunManifest {
            config: self.cfg,
            seed,
            frames_written,
            pad_width: self.cfg.pad_width(),
            pattern: frame_pattern(&self.cfg.basename, self.cfg.pad_width()),
            base_position: self.base,
            source_size: (self.source.width(), self.source.height()),
        };
        let path = self.cfg.manifest_path();
        let written = serde_json::to_string_pretty(&manifest)
            .context("serialize run manifest")
            .and_then(|json| {
                std::fs::write(&path, json)
                    .with_context(|| format!("write run manifest '{}'", path.display()))
            });
        match written {
            Ok(()) => Ok(()),
            Err(e) => self.fail(DriftError::Other(e).into_generation()),
        }
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }

    fn fail<T>(&mut self, e: DriftError) -> DriftResult<T> {
        self.transition(RunState::Failed);
        Err(e)
    }
}

/// Execute a complete run: prepare, write the preview, then (unless preview-only)
/// generate the sequence and write the run manifest.
#[tracing::instrument(skip(cfg))]
pub fn run(cfg: &DriftConfig, mode: RunMode) -> DriftResult<RunSummary> {
    let result = run_inner(cfg, mode);
    if let Err(e) = &result {
        tracing::error!(error = %e, "run failed");
    }
    result
}

fn run_inner(cfg: &DriftConfig, mode: RunMode) -> DriftResult<RunSummary> {
    let mut session = DriftSession::prepare(cfg)?;
    let preview_path = session.write_preview()?;

    if mode == RunMode::PreviewOnly {
        tracing::info!("preview only requested; skipping sequence");
        session.transition(RunState::Done);
        return Ok(RunSummary {
            seed: None,
            preview_path,
            frames_written: 0,
            frames_dir: cfg.paths.frames_dir.clone(),
        });
    }

    let noise = match cfg.motion {
        MotionSpec::Noise { .. } => {
            let noise = NoiseSource::from_requested(cfg.seed);
            tracing::info!(seed = noise.seed(), "using noise seed");
            Some(noise)
        }
        MotionSpec::Periodic { .. } => None,
    };
    let motion = build_motion(cfg, noise.as_ref())?;
    let frames_written = session.generate(motion.as_ref())?;

    let seed = noise.as_ref().map(NoiseSource::seed);
    session.write_manifest(seed, frames_written)?;
    session.transition(RunState::Done);
    tracing::info!(
        frames = frames_written,
        dir = %cfg.paths.frames_dir.display(),
        "frame generation complete"
    );

    Ok(RunSummary {
        seed,
        preview_path,
        frames_written,
        frames_dir: cfg.paths.frames_dir.clone(),
    })
}

fn ensure_dirs(cfg: &DriftConfig) -> DriftResult<()> {
    for dir in [
        &cfg.paths.output_dir,
        &cfg.paths.frames_dir,
        &cfg.paths.final_dir,
    ] {
        create_dir(dir)?;
    }
    Ok(())
}

fn create_dir(dir: &Path) -> DriftResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output directory '{}'", dir.display()))
        .map_err(|e| DriftError::Other(e).into_generation())
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::*;
use crate::config::{Amplitude, BasePlacement, OutputPaths, ScaleSpec};
use crate::foundation::core::Canvas;
use crate::motion::{NoiseMotion, PeriodicMotion};

fn write_input(dir: &Path, w: u32, h: u32) -> PathBuf {
    let path = dir.join("in.png");
    RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255]))
        .save(&path)
        .unwrap();
    path
}

fn small_config(root: &Path, total_frames: u64) -> DriftConfig {
    DriftConfig {
        input_image: write_input(root, 32, 16),
        paths: OutputPaths::under(root.join("out")),
        basename: "unittest".to_string(),
        canvas: Canvas {
            width: 128,
            height: 64,
        },
        duration_secs: 1.0,
        fps: 5,
        total_frames,
        scale: ScaleSpec::Factor(1.0),
        base: BasePlacement::Centered {
            offset_x: 0,
            offset_y: 0,
        },
        motion: MotionSpec::Noise {
            amp: Amplitude { x: 6.0, y: 4.0 },
            timescale_secs: 0.5,
        },
        seed: Some(42),
        ffmpeg_bin: "ffmpeg".to_string(),
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn prepare_computes_base_from_scaled_source() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = DriftConfig {
        scale: ScaleSpec::TargetWidth(16),
        ..small_config(tmp.path(), 5)
    };
    let session = DriftSession::prepare(&cfg).unwrap();
    assert_eq!(
        (session.source().width(), session.source().height()),
        (16, 8)
    );
    assert_eq!(session.base_position(), PastePosition::new(56, 28));
    assert_eq!(session.state(), RunState::Init);
}

#[test]
fn missing_input_fails_before_creating_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = DriftConfig {
        input_image: tmp.path().join("nope.png"),
        ..small_config(tmp.path(), 5)
    };
    let err = DriftSession::prepare(&cfg).err().unwrap();
    assert!(matches!(err, DriftError::Config(_)));
    assert!(!cfg.paths.output_dir.exists());
}

#[test]
fn preview_only_writes_exactly_the_preview() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path(), 10_000);
    let summary = run(&cfg, RunMode::PreviewOnly).unwrap();

    assert_eq!(summary.frames_written, 0);
    assert_eq!(summary.seed, None);
    assert!(summary.preview_path.is_file());
    assert_eq!(
        file_names(&cfg.paths.output_dir),
        vec!["final", "frames", "unittest_preview.png"]
    );
    assert!(file_names(&cfg.paths.frames_dir).is_empty());
}

#[test]
fn full_run_writes_numbered_sequence_and_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path(), 5);
    let summary = run(&cfg, RunMode::Full).unwrap();

    assert_eq!(summary.frames_written, 5);
    assert_eq!(summary.seed, Some(42));
    assert_eq!(
        file_names(&cfg.paths.frames_dir),
        vec![
            "unittest_0001.png",
            "unittest_0002.png",
            "unittest_0003.png",
            "unittest_0004.png",
            "unittest_0005.png",
        ]
    );

    let frame = image::open(cfg.frame_path(FrameIndex(0))).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (128, 64));
    assert_eq!(frame.pixels().filter(|p| p.0[3] != 0).count(), 32 * 16);

    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(cfg.manifest_path()).unwrap()).unwrap();
    assert_eq!(manifest["seed"], 42);
    assert_eq!(manifest["frames_written"], 5);
    assert_eq!(manifest["pattern"], "unittest_%04d.png");
}

#[test]
fn plan_frame_is_reproducible_per_index() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path(), 30);
    let session = DriftSession::prepare(&cfg).unwrap();

    let a = NoiseSource::from_requested(Some(7));
    let b = NoiseSource::from_requested(Some(7));
    let motion_a = NoiseMotion {
        noise: &a,
        amp: Amplitude { x: 18.0, y: 12.0 },
        timescale_secs: 0.5,
    };
    let motion_b = NoiseMotion { noise: &b, ..motion_a };

    let sequential: Vec<_> = (0..30)
        .map(|i| session.plan_frame(&motion_a, FrameIndex(i)))
        .collect();
    let alone = session.plan_frame(&motion_b, FrameIndex(17));
    assert_eq!(alone, sequential[17]);
    assert!((alone.t_secs - 17.0 / 30.0).abs() < 1e-12);
}

#[test]
fn plan_frame_stays_within_amplitude_of_base() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path(), 60);
    let session = DriftSession::prepare(&cfg).unwrap();
    let motion = PeriodicMotion {
        duration_secs: 1.0,
        amp: Amplitude { x: 6.0, y: 4.0 },
        cycles_x: 2.0,
        cycles_y: 1.0,
    };
    let base = session.base_position();
    for i in 0..60 {
        let p = session.plan_frame(&motion, FrameIndex(i)).paste;
        assert!((p.x - base.x).abs() <= 6);
        assert!((p.y - base.y).abs() <= 4);
    }
    assert_eq!(session.plan_frame(&motion, FrameIndex(0)).paste.x, base.x);
}

#[test]
fn sine_run_reports_no_seed() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = DriftConfig {
        motion: MotionSpec::Periodic {
            amp: Amplitude { x: 3.0, y: 3.0 },
            cycles_x: 1.0,
            cycles_y: 1.0,
        },
        seed: None,
        ..small_config(tmp.path(), 3)
    };
    let summary = run(&cfg, RunMode::Full).unwrap();
    assert_eq!(summary.seed, None);
    assert_eq!(summary.frames_written, 3);
}

#[test]
fn unwritable_frame_aborts_and_marks_failed() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path(), 5);
    let mut session = DriftSession::prepare(&cfg).unwrap();
    std::fs::remove_dir_all(&cfg.paths.frames_dir).unwrap();

    let err = session.generate(&StillMotion).unwrap_err();
    assert!(matches!(err, DriftError::Generation(_)));
    assert!(err.to_string().contains("unittest_0001.png"));
    assert_eq!(session.state(), RunState::Failed);
}

#[test]
fn frames_dir_blocked_by_file_is_generation_error() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = small_config(tmp.path(), 5);
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    cfg.paths.frames_dir = blocker.join("frames");

    let err = run(&cfg, RunMode::Full).unwrap_err();
    assert!(matches!(err, DriftError::Generation(_)));
    assert!(err.to_string().contains("blocker"));
}

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::DriftConfig;
use crate::foundation::error::{DriftError, DriftResult};
use crate::render::frame::{frame_pattern, zero_pad_width};

/// Inputs for turning a frame sequence into `<final_dir>/<basename>.webm`.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeOpts {
    pub frames_dir: PathBuf,
    pub final_dir: PathBuf,
    pub basename: String,
    pub fps: u32,
    /// Sequence length; only used to derive the zero-padding width.
    pub total_frames: u64,
    /// Encoder executable name or path.
    pub ffmpeg_bin: String,
}

impl EncodeOpts {
    /// Options matching the sequence a [`DriftConfig`] run writes.
    pub fn from_config(cfg: &DriftConfig) -> Self {
        Self {
            frames_dir: cfg.paths.frames_dir.clone(),
            final_dir: cfg.paths.final_dir.clone(),
            basename: cfg.basename.clone(),
            fps: cfg.fps,
            total_frames: cfg.total_frames,
            ffmpeg_bin: cfg.ffmpeg_bin.clone(),
        }
    }
}

/// The exact encoder invocation for a sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodePlan {
    /// Working directory the encoder runs in.
    pub frames_dir: PathBuf,
    /// Input pattern, relative to `frames_dir`.
    pub pattern: String,
    /// Output video path.
    pub out_path: PathBuf,
    pub program: String,
    pub args: Vec<OsString>,
}

impl EncodePlan {
    /// Build the fixed VP9/yuva420p command for `opts`.
    pub fn new(opts: &EncodeOpts) -> Self {
        let pattern = frame_pattern(&opts.basename, zero_pad_width(opts.total_frames));
        let out_path = opts.final_dir.join(format!("{}.webm", opts.basename));

        let mut args: Vec<OsString> = Vec::new();
        args.push("-y".into());
        args.push("-framerate".into());
        args.push(opts.fps.to_string().into());
        args.push("-i".into());
        args.push(pattern.clone().into());
        for a in [
            "-c:v",
            "libvpx-vp9",
            "-pix_fmt",
            "yuva420p",
            "-auto-alt-ref",
            "0",
        ] {
            args.push(a.into());
        }
        args.push(absolute_or_as_is(&out_path).into_os_string());

        Self {
            frames_dir: opts.frames_dir.clone(),
            pattern,
            out_path,
            program: opts.ffmpeg_bin.clone(),
            args,
        }
    }

    /// Copy-pasteable shell text: `cd <frames_dir>` followed by the encoder command.
    ///
    /// Arguments containing whitespace or shell metacharacters are single-quoted.
    pub fn command_line(&self) -> String {
        let mut line = shell_quote(&self.program);
        for a in &self.args {
            line.push(' ');
            line.push_str(&shell_quote(&a.to_string_lossy()));
        }
        format!(
            "cd {}\n{line}",
            shell_quote(&self.frames_dir.to_string_lossy())
        )
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=%+,@".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

/// How an encode request was satisfied.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodeOutcome {
    /// The encoder ran and wrote this file.
    Encoded(PathBuf),
    /// The encoder binary is unavailable; this is the command to run elsewhere.
    CommandOnly(String),
}

/// Return `true` when `bin` resolves to an executable file.
///
/// A bare name is searched in `PATH`; anything with a directory part is checked as given.
/// The binary is never run here, so an installed but broken encoder still reaches
/// [`encode`] and fails there with an encoder error.
pub fn is_ffmpeg_on_path(bin: &str) -> bool {
    resolve_program(bin).is_some()
}

fn resolve_program(bin: &str) -> Option<PathBuf> {
    let given = Path::new(bin);
    if bin.is_empty() {
        return None;
    }
    if given.is_absolute() || given.components().count() > 1 {
        return is_executable_file(given).then(|| given.to_path_buf());
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .flat_map(|dir| program_names(bin).map(move |name| dir.join(name)))
        .find(|candidate| is_executable_file(candidate))
}

fn program_names(bin: &str) -> impl Iterator<Item = String> {
    let exe = (cfg!(windows) && Path::new(bin).extension().is_none()).then(|| format!("{bin}.exe"));
    std::iter::once(bin.to_string()).chain(exe)
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt as _;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// Encode the sequence described by `opts`.
///
/// Never touches the frames themselves, whatever the outcome.
#[tracing::instrument(skip(opts), fields(frames_dir = %opts.frames_dir.display()))]
pub fn encode(opts: &EncodeOpts) -> DriftResult<EncodeOutcome> {
    if opts.fps == 0 {
        return Err(DriftError::config("FPS must be > 0, got 0"));
    }
    if !opts.frames_dir.is_dir() {
        return Err(DriftError::encoder(format!(
            "frames directory not found: '{}'",
            opts.frames_dir.display()
        )));
    }

    let plan = EncodePlan::new(opts);
    if !is_ffmpeg_on_path(&plan.program) {
        tracing::warn!(bin = %plan.program, "encoder not found; emitting command instead");
        return Ok(EncodeOutcome::CommandOnly(plan.command_line()));
    }
    run_plan(&plan)?;
    Ok(EncodeOutcome::Encoded(plan.out_path))
}

fn run_plan(plan: &EncodePlan) -> DriftResult<()> {
    if let Some(parent) = plan.out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DriftError::encoder(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    tracing::info!(command = %plan.command_line().replace('\n', " && "), "running encoder");
    let output = Command::new(&plan.program)
        .args(&plan.args)
        .current_dir(&plan.frames_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            DriftError::encoder(format!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                plan.program
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DriftError::encoder(format!(
            "{} exited with status {}: {}",
            plan.program,
            output.status,
            stderr.trim()
        )));
    }

    tracing::info!(out = %plan.out_path.display(), "encoding finished");
    Ok(())
}

/// The encoder runs inside the frames directory, so a relative output path is resolved
/// against the current directory first.
fn absolute_or_as_is(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;

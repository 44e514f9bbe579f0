use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use imagedrift::{DriftConfig, DriftError, EncodeOpts, EncodeOutcome, RunMode};

/// Animate a still image drifting across a transparent canvas.
///
/// All parameters are read from the environment (INPUT_IMAGE, OUT_W, MOTION_MODE, ...).
#[derive(Parser, Debug)]
#[command(name = "imagedrift", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the preview and the PNG frame sequence.
    Generate {
        /// Only write the preview image.
        #[arg(long)]
        preview: bool,
    },
    /// Encode an existing frame sequence to WebM (prints the command if ffmpeg is missing).
    Encode,
    /// Generate, then encode.
    Run,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = DriftConfig::from_env().and_then(|cfg| match cli.cmd {
        Command::Generate { preview } => cmd_generate(&cfg, preview),
        Command::Encode => cmd_encode(&cfg),
        Command::Run => cmd_generate(&cfg, false).and_then(|()| cmd_encode(&cfg)),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_generate(cfg: &DriftConfig, preview: bool) -> Result<(), DriftError> {
    let mode = if preview {
        RunMode::PreviewOnly
    } else {
        RunMode::Full
    };
    let summary = imagedrift::run(cfg, mode)?;

    eprintln!("wrote {}", summary.preview_path.display());
    if summary.frames_written > 0 {
        eprintln!(
            "wrote {} frames to {}",
            summary.frames_written,
            summary.frames_dir.display()
        );
    }
    if let Some(seed) = summary.seed {
        eprintln!("noise seed: {seed} (set NOISE_SEED={seed} to reproduce)");
    }
    Ok(())
}

fn cmd_encode(cfg: &DriftConfig) -> Result<(), DriftError> {
    match imagedrift::encode(&EncodeOpts::from_config(cfg))? {
        EncodeOutcome::Encoded(path) => eprintln!("wrote {}", path.display()),
        EncodeOutcome::CommandOnly(text) => {
            println!("ffmpeg not found. Run the following on a machine with ffmpeg:");
            println!();
            println!("{text}");
            println!();
        }
    }
    Ok(())
}

fn exit_code(e: &DriftError) -> u8 {
    u8::try_from(e.exit_code()).unwrap_or(1)
}

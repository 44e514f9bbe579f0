//! Encoding of the generated PNG sequence.

/// `ffmpeg`-based WebM (VP9 + alpha) output via the system `ffmpeg`.
pub mod ffmpeg;

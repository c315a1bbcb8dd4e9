//! FFmpeg/FFprobe helpers for sampling inspection videos into frames.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Error type for FFmpeg/FFprobe operations.
#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("ffprobe/ffmpeg binary not found: {0}")]
    NotFound(std::io::Error),

    #[error("ffprobe/ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("video file not found: {0}")]
    VideoNotFound(String),

    #[error("sampling rate must be positive, got {0}")]
    InvalidFps(f64),
}

/// Subset of `ffprobe -print_format json -show_format -show_streams`.
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
    pub format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    pub codec_type: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
}

fn ensure_exists(path: &Path) -> Result<(), FfmpegError> {
    if path.exists() {
        Ok(())
    } else {
        Err(FfmpegError::VideoNotFound(path.to_string_lossy().to_string()))
    }
}

fn check_status(output: &std::process::Output) -> Result<(), FfmpegError> {
    if output.status.success() {
        Ok(())
    } else {
        Err(FfmpegError::ExecutionFailed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Run `ffprobe` on a video file and return the parsed JSON output.
pub async fn probe_video(path: &Path) -> Result<FfprobeOutput, FfmpegError> {
    ensure_exists(path)?;

    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;
    check_status(&output)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str::<FfprobeOutput>(&stdout)
        .map_err(|e| FfmpegError::ParseError(format!("{e}: {stdout}")))
}

/// Video duration in seconds, format-level first, then the first video stream.
pub fn parse_duration(probe: &FfprobeOutput) -> f64 {
    let from_format = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok());
    let from_stream = || {
        probe
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .and_then(|s| s.duration.as_deref())
            .and_then(|d| d.parse::<f64>().ok())
    };
    from_format.or_else(from_stream).unwrap_or(0.0)
}

/// Name of the `n`-th (1-based) sampled frame.
pub fn frame_file_name(n: usize) -> String {
    format!("frame_{n:05}.jpg")
}

/// Sample `fps` frames per second from `video_path` into `output_dir`.
///
/// Returns the written frame paths in playback order.
pub async fn extract_frames(
    video_path: &Path,
    output_dir: &Path,
    fps: f64,
) -> Result<Vec<PathBuf>, FfmpegError> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(FfmpegError::InvalidFps(fps));
    }
    ensure_exists(video_path)?;
    tokio::fs::create_dir_all(output_dir).await?;

    let output = tokio::process::Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(video_path)
        .args(["-vf", &format!("fps={fps}"), "-q:v", "2"])
        .arg(output_dir.join("frame_%05d.jpg"))
        .output()
        .await
        .map_err(FfmpegError::NotFound)?;
    check_status(&output)?;

    collect_frames(output_dir).await
}

/// List `frame_*.jpg` files in `dir`, sorted by name.
pub async fn collect_frames(dir: &Path) -> Result<Vec<PathBuf>, FfmpegError> {
    let mut frames = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("frame_") && name.ends_with(".jpg") {
            frames.push(entry.path());
        }
    }
    frames.sort();
    Ok(frames)
}

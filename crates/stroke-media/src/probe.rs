//! FFprobe duration probing.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Get video duration in seconds.
pub async fn probe_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ffprobe_failed(
            "FFprobe could not read the file",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    parse_duration(&output.stdout)
}

/// Extract `format.duration` from FFprobe JSON output.
fn parse_duration(stdout: &[u8]) -> MediaResult<f64> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)?;

    let raw = probe
        .format
        .duration
        .ok_or_else(|| MediaError::InvalidVideo("FFprobe reported no duration".to_string()))?;

    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .ok_or_else(|| MediaError::InvalidVideo(format!("Unreadable duration: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let json = br#"{"format": {"filename": "a.mp4", "duration": "30.033333"}}"#;
        assert!((parse_duration(json).unwrap() - 30.033333).abs() < 1e-6);
    }

    #[test]
    fn test_missing_duration_is_invalid() {
        let json = br#"{"format": {"filename": "a.mp4"}}"#;
        assert!(matches!(parse_duration(json), Err(MediaError::InvalidVideo(_))));

        let json = br#"{"format": {"duration": "N/A"}}"#;
        assert!(matches!(parse_duration(json), Err(MediaError::InvalidVideo(_))));
    }

    #[test]
    fn test_garbage_output_is_json_error() {
        assert!(matches!(parse_duration(b""), Err(MediaError::JsonParse(_))));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = probe_duration("/definitely/not/here.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}

//! Fixed limits and defaults for uploads and frame sampling.

/// Frames sampled from each upload.
pub const FRAMES_TO_EXTRACT: usize = 10;

/// Only the first this-many seconds of a video are sampled.
pub const MAX_VIDEO_DURATION_SECS: f64 = 120.0;

/// Upper bound on a single FFmpeg extraction run.
pub const FFMPEG_TIMEOUT_SECS: u64 = 60;

/// Default maximum upload size (500 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Accepted upload extensions (lowercase, without the dot).
pub const ALLOWED_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "m4v", "webm"];

/// JPEG quality passed to `-q:v` (1 = best, 31 = worst).
pub const FRAME_JPEG_QUALITY: u8 = 2;

/// Media type of every extracted frame.
pub const FRAME_MEDIA_TYPE: &str = "image/jpeg";

/// Placeholder used when the student did not give a name.
pub const DEFAULT_STUDENT_NAME: &str = "Student";

pub const MAX_STUDENT_NAME_CHARS: usize = 50;
pub const MAX_CONCERNS_CHARS: usize = 500;

/// Check a filename against [`ALLOWED_VIDEO_EXTENSIONS`].
///
/// The extension is whatever follows the last dot, compared case-insensitively.
pub fn is_allowed_video_filename(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_VIDEO_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

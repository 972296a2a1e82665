//! Capture date resolution
//!
//! A photo's capture date comes from:
//! - EXIF metadata (`DateTimeOriginal`, `DateTimeDigitized`, `DateTime`)
//! - File system modification time, when no usable EXIF date exists

pub mod exif;
pub mod filesystem;

use crate::error::Result;
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Source of the resolved timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// Read from an EXIF date tag
    Metadata,
    /// File system modification time
    FileSystem,
}

/// The date a photo is filed under
///
/// EXIF dates carry no timezone and stay naive; file system dates are UTC.
/// The two are kept apart rather than guessing the camera's offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDate {
    Metadata(NaiveDateTime),
    FileSystem(DateTime<Utc>),
}

impl CaptureDate {
    pub fn year(&self) -> i32 {
        match self {
            CaptureDate::Metadata(dt) => dt.year(),
            CaptureDate::FileSystem(dt) => dt.year(),
        }
    }

    pub fn month(&self) -> u32 {
        match self {
            CaptureDate::Metadata(dt) => dt.month(),
            CaptureDate::FileSystem(dt) => dt.month(),
        }
    }

    pub fn source(&self) -> TimeSource {
        match self {
            CaptureDate::Metadata(_) => TimeSource::Metadata,
            CaptureDate::FileSystem(_) => TimeSource::FileSystem,
        }
    }
}

impl fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureDate::Metadata(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CaptureDate::FileSystem(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
        }
    }
}

/// Resolve the capture date of an image file
///
/// EXIF wins when it yields a parseable date; otherwise the modification
/// time is used. Only a failure to stat the file is returned as an error.
pub fn resolve_capture_date(path: &Path) -> Result<CaptureDate> {
    if let Some(date) = exif::extract_exif_date(path) {
        debug!(?path, %date, "Using EXIF capture date");
        return Ok(date);
    }

    let date = filesystem::modified_date(path)?;
    debug!(?path, %date, "No EXIF date, using modification time");
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{jpeg_with_dates, set_mtime};
    use chrono::TimeZone;
    use std::fs;

    #[test]
    fn test_capture_date_parts() {
        let naive = NaiveDateTime::parse_from_str("2023:07:04 12:00:00", "%Y:%m:%d %H:%M:%S").unwrap();
        let date = CaptureDate::Metadata(naive);
        assert_eq!((date.year(), date.month()), (2023, 7));
        assert_eq!(date.source(), TimeSource::Metadata);
        assert_eq!(date.to_string(), "2023-07-04 12:00:00");

        let date = CaptureDate::FileSystem(Utc.with_ymd_and_hms(2026, 2, 12, 0, 0, 0).unwrap());
        assert_eq!((date.year(), date.month()), (2026, 2));
        assert_eq!(date.source(), TimeSource::FileSystem);
        assert_eq!(date.to_string(), "2026-02-12 00:00:00 UTC");
    }

    #[test]
    fn test_metadata_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        fs::write(&path, jpeg_with_dates(&[("DateTimeOriginal", "2024:05:01 10:00:00")])).unwrap();
        set_mtime(&path, 1_770_854_400);

        let date = resolve_capture_date(&path).unwrap();
        assert_eq!(date.source(), TimeSource::Metadata);
        assert_eq!((date.year(), date.month()), (2024, 5));
    }

    #[test]
    fn test_fallback_without_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jpg");
        fs::write(&path, b"not an image").unwrap();
        set_mtime(&path, 1_770_854_400);

        let date = resolve_capture_date(&path).unwrap();
        assert_eq!(
            date,
            CaptureDate::FileSystem(Utc.with_ymd_and_hms(2026, 2, 12, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_capture_date(&dir.path().join("gone.jpg")).is_err());
    }
}

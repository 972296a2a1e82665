//! Modification-time fallback

use super::CaptureDate;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Read a file's last modification time as a UTC capture date
pub fn modified_date(path: &Path) -> Result<CaptureDate> {
    let modified = fs::metadata(path)?.modified()?;
    let datetime: DateTime<Utc> = modified.into();
    Ok(CaptureDate::FileSystem(datetime))
}

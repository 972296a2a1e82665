//! Photo Organizer - sort photos into dated folders
//!
//! This library moves image files into `<out>/<YYYY>/<YYYY-MM>/` based on
//! their capture date:
//! - EXIF date tags, with the file system modification time as fallback
//! - Deterministic, sorted scanning and planning
//! - Dry-run by default, sequential apply on request
//! - Optional destination collision checks

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod plan;
pub mod process;
pub mod scan;
pub mod time;

#[cfg(any(test, feature = "test-util"))]
#[doc(hidden)]
pub mod testutil;

pub use cli::Cli;
pub use config::{CollisionPolicy, Config, ConfigError};
pub use display::{MoveSink, TableRenderer, render_report, summary_line};
pub use error::{Error, Result};
pub use plan::{Collision, MovePlan, PlannedMove, plan_moves};
pub use process::{Organizer, PlanExecutor, RunReport};
pub use scan::{ImageFile, scan_images};
pub use time::{CaptureDate, TimeSource, resolve_capture_date};

//! Plan execution
//!
//! Handles the part of a run that touches the file system:
//! - Checking the plan for destination collisions
//! - Creating the dated output folders
//! - Moving files, strictly in plan order

use crate::config::{CollisionPolicy, Config};
use crate::error::{Error, Result};
use crate::plan::{MovePlan, PlannedMove, plan_moves};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{Level, debug, error, info, span, warn};

/// Applies a move plan
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanExecutor {
    on_collision: CollisionPolicy,
}

impl PlanExecutor {
    pub fn new(on_collision: CollisionPolicy) -> Self {
        Self { on_collision }
    }

    /// Dry-run: log every move and touch nothing
    pub fn preview(&self, plan: &MovePlan) {
        for planned in plan {
            info!(
                source = ?planned.source(),
                destination = ?planned.destination(),
                time_source = ?planned.date().source(),
                "Would move file"
            );
        }
    }

    /// Check the whole plan for shared destinations before anything moves
    ///
    /// Under `Overwrite` each collision is logged; under `Fail` the first one is
    /// returned as an error.
    pub fn check_collisions(&self, plan: &MovePlan) -> Result<()> {
        for collision in plan.collisions() {
            match self.on_collision {
                CollisionPolicy::Overwrite => warn!(
                    destination = ?collision.destination,
                    sources = ?collision.sources,
                    "Several files share a destination, later ones overwrite earlier ones"
                ),
                CollisionPolicy::Fail => {
                    return Err(Error::DestinationCollision {
                        destination: collision.destination,
                        sources: collision.sources,
                        existing: false,
                        applied: 0,
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply every move in order, returning how many were applied
    ///
    /// The first failure stops the run. Moves already applied stay applied and
    /// their count is carried in the error (see [`Error::applied`]).
    pub fn apply(&self, plan: &MovePlan) -> Result<usize> {
        let _span = span!(Level::INFO, "apply_plan", moves = plan.len()).entered();

        for (applied, planned) in plan.iter().enumerate() {
            if planned.destination().exists() {
                match self.on_collision {
                    CollisionPolicy::Overwrite => warn!(
                        destination = ?planned.destination(),
                        "Overwriting existing file"
                    ),
                    CollisionPolicy::Fail => {
                        return Err(Error::DestinationCollision {
                            destination: planned.destination().to_path_buf(),
                            sources: vec![planned.source().to_path_buf()],
                            existing: true,
                            applied,
                        });
                    }
                }
            }

            if let Err(e) = move_file(planned) {
                error!(
                    source = ?planned.source(),
                    destination = ?planned.destination(),
                    error = %e,
                    "Failed to move file"
                );
                return Err(Error::Move {
                    from: planned.source().to_path_buf(),
                    to: planned.destination().to_path_buf(),
                    applied,
                    source: e,
                });
            }

            info!(
                source = ?planned.source(),
                destination = ?planned.destination(),
                time_source = ?planned.date().source(),
                date = %planned.date(),
                "Moved file"
            );
        }

        Ok(plan.len())
    }
}

/// Outcome of one organizer run
#[derive(Debug)]
pub struct RunReport {
    /// The plan computed before anything moved
    pub plan: MovePlan,
    /// Whether the plan was meant to be applied
    pub applied_mode: bool,
    /// Moves completed
    pub applied: usize,
    /// Error that stopped the apply phase, if any
    pub failure: Option<Error>,
}

impl RunReport {
    pub fn is_dry_run(&self) -> bool {
        !self.applied_mode
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Plans and, when asked to, applies one run
pub struct Organizer {
    config: Config,
}

impl Organizer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline: scan, plan, then apply or preview
    ///
    /// Planning errors are returned directly. Errors while applying are kept
    /// in the report next to the plan so the caller can still show it.
    pub fn run(&self) -> Result<RunReport> {
        let _span = span!(Level::INFO, "organizer_run").entered();

        info!(source = ?self.config.source_dir, "Scanning source directory...");
        let plan = plan_moves(&self.config)?;
        let executor = PlanExecutor::new(self.config.on_collision);

        if !self.config.apply {
            executor.preview(&plan);
            info!(planned = plan.len(), "Dry run complete, nothing was moved");
            return Ok(RunReport {
                plan,
                applied_mode: false,
                applied: 0,
                failure: None,
            });
        }

        let outcome = executor
            .check_collisions(&plan)
            .and_then(|_| fs::create_dir_all(&self.config.output_dir).map_err(Error::from))
            .and_then(|_| executor.apply(&plan));

        let (applied, failure) = match outcome {
            Ok(applied) => (applied, None),
            Err(e) => (e.applied().unwrap_or(0), Some(e)),
        };

        info!(applied, planned = plan.len(), "Apply finished");

        Ok(RunReport {
            plan,
            applied_mode: true,
            applied,
            failure,
        })
    }
}

/// Move one file, creating its destination folder first
fn move_file(planned: &PlannedMove) -> io::Result<()> {
    let (source, dest) = (planned.source(), planned.destination());

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    // Try rename first (faster for same filesystem)
    if let Err(e) = fs::rename(source, dest) {
        debug!(?source, ?dest, error = %e, "Rename failed, falling back to copy and delete");
        copy_file(source, dest)?;
        preserve_mtime(source, dest);
        fs::remove_file(source)?;
    }

    Ok(())
}

/// Copy the modification time of `source` onto `dest`, logging when it can't
fn preserve_mtime(source: &Path, dest: &Path) {
    let mtime = match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(mtime) => mtime,
        Err(e) => {
            warn!(?source, error = %e, "Failed to read modification time");
            return;
        }
    };

    if let Err(e) = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime)) {
        warn!(?dest, error = %e, "Failed to preserve modification time");
    }
}

/// Copy file with buffered I/O
fn copy_file(source: &Path, dest: &Path) -> io::Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(())
}

//! Move planning
//!
//! Turns scanned images into an ordered list of source → destination moves
//! under `<out>/<YYYY>/<YYYY-MM>/<file name>`. Planning never touches the
//! file system beyond reading metadata.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::scan::{ImageFile, scan_images};
use crate::time::{CaptureDate, resolve_capture_date};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One planned move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    source: PathBuf,
    destination: PathBuf,
    date: CaptureDate,
}

impl PlannedMove {
    /// Plan the move of `source` into the dated folder under `output_dir`
    pub fn new(source: PathBuf, output_dir: &Path, date: CaptureDate) -> Result<Self> {
        let destination = destination_path(&source, output_dir, &date)?;
        Ok(Self {
            source,
            destination,
            date,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn date(&self) -> &CaptureDate {
        &self.date
    }
}

/// Destination shared by several planned moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub destination: PathBuf,
    pub sources: Vec<PathBuf>,
}

/// Ordered list of planned moves, in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovePlan {
    moves: Vec<PlannedMove>,
}

impl MovePlan {
    pub fn new(moves: Vec<PlannedMove>) -> Self {
        Self { moves }
    }

    pub fn moves(&self) -> &[PlannedMove] {
        &self.moves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlannedMove> {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Destinations claimed by more than one move, in order of first appearance
    pub fn collisions(&self) -> Vec<Collision> {
        let mut index: HashMap<&Path, usize> = HashMap::new();
        let mut groups: Vec<Collision> = Vec::new();

        for planned in &self.moves {
            match index.get(planned.destination()) {
                Some(&i) => groups[i].sources.push(planned.source.clone()),
                None => {
                    index.insert(planned.destination(), groups.len());
                    groups.push(Collision {
                        destination: planned.destination.clone(),
                        sources: vec![planned.source.clone()],
                    });
                }
            }
        }

        groups.retain(|g| g.sources.len() > 1);
        groups
    }
}

impl<'a> IntoIterator for &'a MovePlan {
    type Item = &'a PlannedMove;
    type IntoIter = std::slice::Iter<'a, PlannedMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// Build the plan for everything under `config.source_dir`
pub fn plan_moves(config: &Config) -> Result<MovePlan> {
    let files = scan_images(&config.source_dir, config)?;
    info!(count = files.len(), "Found image files");
    plan_files(files, &config.output_dir)
}

/// Resolve dates and destinations for already-scanned files, keeping their order
pub fn plan_files(files: Vec<ImageFile>, output_dir: &Path) -> Result<MovePlan> {
    let mut moves = Vec::with_capacity(files.len());

    for file in files {
        let date = resolve_capture_date(file.path())?;
        let planned = PlannedMove::new(file.into_path(), output_dir, date)?;
        debug!(
            source = ?planned.source,
            destination = ?planned.destination,
            time_source = ?date.source(),
            "Planned move"
        );
        moves.push(planned);
    }

    Ok(MovePlan::new(moves))
}

/// `<out>/<YYYY>/<YYYY-MM>/<file name>`
pub fn destination_path(source: &Path, output_dir: &Path, date: &CaptureDate) -> Result<PathBuf> {
    let filename = source.file_name().ok_or_else(|| Error::InvalidFileName {
        path: source.to_path_buf(),
    })?;

    let mut dest = output_dir.to_path_buf();
    dest.push(format!("{:04}", date.year()));
    dest.push(format!("{:04}-{:02}", date.year(), date.month()));
    dest.push(filename);
    Ok(dest)
}

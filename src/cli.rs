//! CLI argument parsing with clap

use crate::config::{CollisionPolicy, Config};
use clap::Parser;
use std::path::PathBuf;

/// Photo Organizer - sort images into YYYY/YYYY-MM folders
///
/// Reads the capture date from EXIF metadata (falling back to the file's
/// modification time) and moves each image to
/// OUT/<YYYY>/<YYYY-MM>/<file name>. Without --do-it nothing is moved.
#[derive(Parser, Debug)]
#[command(name = "photo-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directory to scan recursively
    #[arg(value_parser = existing_dir)]
    pub src: PathBuf,

    /// Output directory for organized files
    pub out: PathBuf,

    /// Apply changes (otherwise dry-run)
    #[arg(long)]
    pub do_it: bool,

    /// Path to configuration file (TOML format)
    ///
    /// CLI arguments override settings from the file.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// What to do when two files map to the same destination
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionPolicy>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, env = "PHOTO_ORGANIZER_LOG")]
    pub log_file: Option<PathBuf>,

    /// Output file log as JSON
    #[arg(long)]
    pub json_log: bool,
}

fn existing_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("'{s}' is not an existing directory"))
    }
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        config.source_dir = self.src.clone();
        config.output_dir = self.out.clone();
        if self.do_it {
            config.apply = true;
        }
        if let Some(policy) = self.on_collision {
            config.on_collision = policy;
        }
        if self.verbose {
            config.verbose = true;
        }
        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["photo-organizer", "--do-it", src, "out"]).unwrap();
        assert!(cli.do_it);
        assert_eq!(cli.out, PathBuf::from("out"));

        let config = cli.to_config();
        assert!(config.apply);
        assert_eq!(config.source_dir, dir.path());
        assert_eq!(config.on_collision, CollisionPolicy::Overwrite);
    }

    #[test]
    fn test_default_is_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["photo-organizer", src, "out"]).unwrap();
        assert!(!cli.to_config().apply);
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().to_str().unwrap();
        let file = Config {
            on_collision: CollisionPolicy::Overwrite,
            preview_limit: 5,
            output_dir: PathBuf::from("elsewhere"),
            ..Config::default()
        };

        let cli = Cli::try_parse_from(["photo-organizer", "--on-collision", "fail", src, "out"]).unwrap();
        let config = cli.merge_with_config(file);
        assert_eq!(config.on_collision, CollisionPolicy::Fail);
        assert_eq!(config.preview_limit, 5);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_missing_source_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = Cli::try_parse_from(["photo-organizer", missing.to_str().unwrap(), "out"]);
        assert!(result.is_err());
    }
}

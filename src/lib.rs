//! extsort - sort a directory tree into per-extension folders
//!
//! This library walks a directory, moves every file into
//! `Organized/<extension>/` under that directory, resolves name collisions by
//! replacing or renaming, logs each move to `Organized/organize_log.txt` and
//! reports how many files landed in each category. Run settings are persisted in
//! an INI file so repeated runs behave the same way.

pub mod action_log;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;

pub use action_log::ActionLog;
pub use config::{ConfigError, Configuration, LogLevel, load_config, load_config_from};
pub use file_category::{Category, Summary};
pub use file_organizer::{FileOrganizer, FilesystemError, Plan, PlannedMove, organize};

pub use cli::{Args, run_cli};

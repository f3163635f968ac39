//! extsort - group the files of a directory by extension
//!
//! This library moves every entry of a directory into a subdirectory named
//! after the entry's extension, reporting name conflicts instead of
//! overwriting, with optional TOML configuration for filtering entries.

pub mod cli;
pub mod config;
pub mod extension_key;
pub mod file_organizer;
pub mod output;
pub mod report;

pub use config::{CompiledFilters, Config, ConfigError, FilterRules, OrganizeOptions};
pub use extension_key::extension_key;
pub use file_organizer::{FileOrganizer, OrganizeError, OrganizeResult, Placement};
pub use report::{EntryOutcome, OrganizeReport};

pub use cli::{Args, run_cli};

//! Moves the entries of a directory into folders named after their extension.
//!
//! The organizer makes a single pass over the immediate entries of a target
//! directory. Every entry is handled independently: a failure on one entry is
//! recorded in the [`OrganizeReport`] and processing continues with the next.
//! Only an unreadable target directory aborts the run.

use crate::config::{CompiledFilters, ConfigError, OrganizeOptions};
use crate::extension_key::{extension_key_os, folder_for_key};
use crate::report::{EntryOutcome, OrganizeReport};
use log::{debug, info, warn};
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file organization operations.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The base directory is missing, unreadable or not a directory.
    #[error("Cannot read directory {}: {source}", path.display())]
    InvalidBasePath { path: PathBuf, source: io::Error },
    /// Failed to create an extension folder.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Something other than a directory already uses the folder name.
    #[error("Destination {} exists and is not a directory", path.display())]
    DestinationNotDirectory { path: PathBuf },
    /// Failed to move an entry into its extension folder.
    #[error("Failed to move {} to {}: {source}", path.display(), destination.display())]
    FileMoveFailure {
        path: PathBuf,
        destination: PathBuf,
        source: io::Error,
    },
    /// The organizer options are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Where an entry ended up after [`FileOrganizer::move_to_folder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The entry now lives at this path.
    Moved(PathBuf),
    /// A same-named entry already exists at this path; nothing was moved.
    Conflict(PathBuf),
}

/// Organizes a directory by extension.
///
/// # Examples
///
/// ```no_run
/// use extsort::file_organizer::FileOrganizer;
/// use std::path::Path;
///
/// let organizer = FileOrganizer::default();
/// let report = organizer.organize(Path::new("/path/to/downloads"))?;
/// println!("moved {} entries, {} conflicts", report.moved(), report.conflicts());
/// # Ok::<(), extsort::file_organizer::OrganizeError>(())
/// ```
#[derive(Debug, Default)]
pub struct FileOrganizer {
    options: OrganizeOptions,
    filters: CompiledFilters,
}

impl FileOrganizer {
    /// Creates an organizer with the given options and entry filters.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::Config` if the options fail validation.
    pub fn new(options: OrganizeOptions, filters: CompiledFilters) -> OrganizeResult<Self> {
        options.validate()?;
        Ok(Self { options, filters })
    }

    /// The options this organizer runs with.
    pub fn options(&self) -> &OrganizeOptions {
        &self.options
    }

    /// Moves every eligible entry of `base_path` into its extension folder.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidBasePath` if the directory cannot be
    /// listed. Per-entry failures are reported in the returned report.
    pub fn organize(&self, base_path: &Path) -> OrganizeResult<OrganizeReport> {
        self.run(base_path, false, |_| {})
    }

    /// Computes what [`organize`](Self::organize) would do without touching
    /// the filesystem.
    pub fn preview(&self, base_path: &Path) -> OrganizeResult<OrganizeReport> {
        self.run(base_path, true, |_| {})
    }

    /// Processes every entry of `base_path`, calling `on_entry` after each one.
    ///
    /// Entries are handled in directory listing order.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidBasePath` if the directory cannot be
    /// listed.
    pub fn run<F>(
        &self,
        base_path: &Path,
        dry_run: bool,
        mut on_entry: F,
    ) -> OrganizeResult<OrganizeReport>
    where
        F: FnMut(&EntryOutcome),
    {
        // Snapshot the listing so folders created below are not visited.
        let entries: Vec<_> = fs::read_dir(base_path)
            .map_err(|e| OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: e,
            })?
            .collect();

        info!(
            "{} {}",
            if dry_run { "Previewing" } else { "Organizing" },
            base_path.display()
        );

        let mut report = OrganizeReport::new(base_path.to_path_buf(), dry_run);

        for entry in entries {
            let outcome = match entry {
                Ok(entry) => self.process_entry(base_path, &entry, dry_run),
                Err(e) => EntryOutcome::Failed {
                    path: base_path.to_path_buf(),
                    reason: format!("Failed to read directory entry: {}", e),
                },
            };

            match &outcome {
                EntryOutcome::Conflict { path, existing } => info!(
                    "Conflict: {} already exists, leaving {} in place",
                    existing.display(),
                    path.display()
                ),
                EntryOutcome::Failed { path, reason } => {
                    warn!("{}: {}", path.display(), reason)
                }
                other => debug!("{:?}", other),
            }

            on_entry(&outcome);
            report.push(outcome);
        }

        report.finish();
        info!(
            "Done: {} moved, {} conflicts, {} failed, {} skipped",
            report.moved(),
            report.conflicts(),
            report.failed(),
            report.skipped()
        );

        Ok(report)
    }

    /// Decides and, unless `dry_run`, applies the move of a single entry.
    fn process_entry(&self, base_path: &Path, entry: &DirEntry, dry_run: bool) -> EntryOutcome {
        let path = entry.path();
        let file_name = entry.file_name();

        if !self.filters.should_include(&file_name.to_string_lossy()) {
            return EntryOutcome::Skipped {
                path,
                reason: "excluded by filter rules".to_string(),
            };
        }

        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(e) => {
                return EntryOutcome::Failed {
                    path,
                    reason: format!("Failed to read entry type: {}", e),
                };
            }
        };

        if is_dir && !self.options.include_directories {
            return EntryOutcome::Skipped {
                path,
                reason: "directory".to_string(),
            };
        }

        let key = extension_key_os(&file_name, self.options.lowercase_extensions);

        // Extensionless directories are usually folders made by an earlier run.
        if is_dir && key.is_empty() {
            return EntryOutcome::Skipped {
                path,
                reason: "directory without extension".to_string(),
            };
        }

        if is_dir && file_name == self.options.no_extension_dir.as_str() {
            return EntryOutcome::Skipped {
                path,
                reason: "no-extension folder".to_string(),
            };
        }

        let folder = folder_for_key(&key, &self.options.no_extension_dir).to_string();

        let placement = if dry_run {
            Self::resolve_destination(base_path, &path, &folder).map(|dest| match dest {
                Destination::Free(to) => EntryOutcome::WouldMove {
                    from: path.clone(),
                    to,
                    folder: folder.clone(),
                },
                Destination::Occupied(existing) => EntryOutcome::Conflict {
                    path: path.clone(),
                    existing,
                },
            })
        } else {
            Self::move_to_folder(base_path, &path, &folder).map(|placement| match placement {
                Placement::Moved(to) => EntryOutcome::Moved {
                    from: path.clone(),
                    to,
                    folder: folder.clone(),
                },
                Placement::Conflict(existing) => EntryOutcome::Conflict {
                    path: path.clone(),
                    existing,
                },
            })
        };

        placement.unwrap_or_else(|e| EntryOutcome::Failed {
            path,
            reason: e.to_string(),
        })
    }

    /// Moves an entry into `folder_name` within the base path.
    ///
    /// The folder is created if it doesn't exist. If the folder already holds
    /// an entry with the same name, nothing is moved and
    /// [`Placement::Conflict`] is returned with the path of that entry.
    ///
    /// # Arguments
    ///
    /// * `base_path` - The directory where extension folders are created
    /// * `entry_path` - The full path to the entry to be moved
    /// * `folder_name` - The name of the destination folder
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use extsort::file_organizer::{FileOrganizer, Placement};
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_folder(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     "png",
    /// );
    ///
    /// match result {
    ///     Ok(Placement::Moved(to)) => println!("Moved to {}", to.display()),
    ///     Ok(Placement::Conflict(existing)) => println!("{} already exists", existing.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_to_folder(
        base_path: &Path,
        entry_path: &Path,
        folder_name: &str,
    ) -> OrganizeResult<Placement> {
        if !base_path.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "base path is not a directory"),
            });
        }

        let destination_path = match Self::resolve_destination(base_path, entry_path, folder_name)? {
            Destination::Occupied(existing) => return Ok(Placement::Conflict(existing)),
            Destination::Free(destination_path) => destination_path,
        };

        let folder_path = base_path.join(folder_name);
        if folder_path.symlink_metadata().is_err() {
            fs::create_dir(&folder_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: folder_path.clone(),
                source: e,
            })?;
            debug!("Created {}", folder_path.display());
        }

        move_entry(entry_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            path: entry_path.to_path_buf(),
            destination: destination_path.clone(),
            source: e,
        })?;

        Ok(Placement::Moved(destination_path))
    }

    /// Works out where an entry would go without changing anything.
    fn resolve_destination(
        base_path: &Path,
        entry_path: &Path,
        folder_name: &str,
    ) -> OrganizeResult<Destination> {
        let folder_path = base_path.join(folder_name);

        // A symlinked folder could point outside the base path.
        if let Ok(metadata) = folder_path.symlink_metadata()
            && !metadata.is_dir()
        {
            return Err(OrganizeError::DestinationNotDirectory { path: folder_path });
        }

        let file_name = entry_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                path: entry_path.to_path_buf(),
                destination: folder_path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "entry has no name component"),
            })?;

        let destination_path = folder_path.join(file_name);

        // symlink_metadata so that dangling links still count as taken
        if destination_path.symlink_metadata().is_ok() {
            Ok(Destination::Occupied(destination_path))
        } else {
            Ok(Destination::Free(destination_path))
        }
    }
}

enum Destination {
    Free(PathBuf),
    Occupied(PathBuf),
}

/// Renames `from` to `to`, copying regular files across filesystems.
fn move_entry(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            if !from.symlink_metadata()?.is_file() {
                return Err(e);
            }
            debug!("{} is on another device, copying", to.display());
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        result => result,
    }
}

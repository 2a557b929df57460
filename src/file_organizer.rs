/// File organization system for moving files into category directories.
///
/// This module walks the immediate entries of a target directory, classifies
/// each file by extension and moves it into a category subdirectory of the
/// target. Name collisions are resolved by appending `_1`, `_2`, ... to the
/// file stem. Directories are never entered or moved.
///
/// Progress is reported as [`OrganizeEvent`]s sent to an [`EventSink`], and
/// every run returns an [`OrganizeReport`] describing what was moved.
use crate::file_category::{CategoryTable, split_name};
use crate::output::ConsoleSink;
use glob::Pattern;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single file relocation, performed or planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// The original path of the file, directly inside the target directory.
    #[serde(serialize_with = "lossy_path")]
    pub original_path: PathBuf,
    /// The final path of the file inside its category directory.
    #[serde(serialize_with = "lossy_path")]
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: String,
    /// The file name at the destination. Differs from the original name when
    /// a collision was resolved.
    pub file_name: String,
}

impl MoveRecord {
    /// Returns true if the file had to be renamed to avoid a collision.
    pub fn was_renamed(&self) -> bool {
        self.original_path.file_name() != self.new_path.file_name()
    }
}

/// Paths are written with `to_string_lossy` so non UTF-8 names still
/// produce a report.
fn lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// How an organize run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every entry of the target was processed.
    Completed,
    /// The target did not exist or was not a directory; nothing was touched.
    InvalidTarget,
}

/// Summary of one organize run.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    /// RFC 3339 timestamp of when the run started.
    pub started_at: String,
    /// The directory that was organized.
    #[serde(serialize_with = "lossy_path")]
    pub target: PathBuf,
    pub status: RunStatus,
    /// True if no file system changes were made.
    pub dry_run: bool,
    /// Moves in the order they were performed.
    pub moves: Vec<MoveRecord>,
    /// Names left in place because they matched an exclusion pattern.
    pub excluded: Vec<String>,
}

impl OrganizeReport {
    fn new(target: &Path, dry_run: bool) -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            target: target.to_path_buf(),
            status: RunStatus::Completed,
            dry_run,
            moves: Vec::new(),
            excluded: Vec::new(),
        }
    }
}

/// Status events emitted while organizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeEvent {
    /// A run has begun on the given target.
    Started { target: PathBuf, dry_run: bool },
    /// The target does not exist or is not a directory.
    InvalidTarget { target: PathBuf },
    /// A file matched an exclusion pattern and was left in place.
    Excluded { file_name: String },
    /// A file is about to be moved (or, in a dry run, would be moved).
    Moving {
        file_name: String,
        category: String,
        destination: PathBuf,
        dry_run: bool,
    },
    /// All entries were processed.
    Completed { moved: usize, dry_run: bool },
}

/// Receiver of [`OrganizeEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: &OrganizeEvent);
}

impl EventSink for Vec<OrganizeEvent> {
    fn emit(&mut self, event: &OrganizeEvent) {
        self.push(event.clone());
    }
}

/// Errors that can occur during file organization.
///
/// An invalid target is not an error; it is reported through
/// [`RunStatus::InvalidTarget`]. Every variant here aborts the run.
#[derive(Debug)]
pub enum OrganizeError {
    /// An exclusion pattern is not a valid glob.
    InvalidPattern { pattern: String, reason: String },
    /// Failed to list the target directory.
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to create a category directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid exclude pattern '{}': {}", pattern, reason)
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { .. } => None,
            Self::ReadDirFailed { source, .. } | Self::DirectoryCreationFailed { source, .. } => {
                Some(source)
            }
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Options controlling an organize run.
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    /// Compute the moves without touching the file system.
    pub dry_run: bool,
    /// Glob patterns matched against file names; matching files stay put.
    pub exclude: Vec<String>,
}

/// Organizes files by moving them into category subdirectories.
pub struct FileOrganizer<'a> {
    table: &'a CategoryTable,
    options: OrganizeOptions,
}

impl Default for FileOrganizer<'static> {
    fn default() -> Self {
        Self::new(CategoryTable::standard())
    }
}

impl<'a> FileOrganizer<'a> {
    /// Creates an organizer classifying with the given table.
    pub fn new(table: &'a CategoryTable) -> Self {
        Self {
            table,
            options: OrganizeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: OrganizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Organizes the immediate entries of `target`.
    ///
    /// If `target` is missing or not a directory, emits
    /// [`OrganizeEvent::InvalidTarget`] and returns a report with
    /// [`RunStatus::InvalidTarget`] without touching the file system.
    /// I/O failures abort the run at the current file and are returned as
    /// errors; files moved before the failure stay where they were moved.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use downsort::file_organizer::{FileOrganizer, OrganizeEvent};
    /// use std::path::Path;
    ///
    /// let mut events: Vec<OrganizeEvent> = Vec::new();
    /// match FileOrganizer::default().run(Path::new("/home/me/Downloads"), &mut events) {
    ///     Ok(report) => println!("Moved {} files", report.moves.len()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn run(&self, target: &Path, sink: &mut dyn EventSink) -> OrganizeResult<OrganizeReport> {
        let dry_run = self.options.dry_run;
        let exclude = compile_patterns(&self.options.exclude)?;
        let mut report = OrganizeReport::new(target, dry_run);

        sink.emit(&OrganizeEvent::Started {
            target: target.to_path_buf(),
            dry_run,
        });

        if !target.is_dir() {
            log::info!("{} is not a directory, nothing to do", target.display());
            sink.emit(&OrganizeEvent::InvalidTarget {
                target: target.to_path_buf(),
            });
            report.status = RunStatus::InvalidTarget;
            return Ok(report);
        }

        // Drain the listing up front so category directories created below
        // are never seen as input.
        let mut entries = fs::read_dir(target)
            .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
            .map_err(|e| OrganizeError::ReadDirFailed {
                path: target.to_path_buf(),
                source: e,
            })?;
        entries.sort_by_key(|entry| entry.file_name());

        // Destinations claimed by a dry run, which never materialize on disk.
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                log::debug!("Skipping directory {}", path.display());
                continue;
            }

            let os_name = entry.file_name();
            let file_name = os_name.to_string_lossy().into_owned();

            if exclude.iter().any(|pattern| pattern.matches(&file_name)) {
                log::debug!("Excluding {}", file_name);
                sink.emit(&OrganizeEvent::Excluded {
                    file_name: file_name.clone(),
                });
                report.excluded.push(file_name);
                continue;
            }

            let category = self.table.classify(&file_name).to_string();
            let category_dir = target.join(&category);
            if dry_run {
                check_dir_creatable(&category_dir)?;
            } else {
                ensure_dir(&category_dir)?;
            }

            let destination = resolve_destination(&category_dir, &os_name, |candidate| {
                is_occupied(candidate) || claimed.contains(candidate)
            });

            sink.emit(&OrganizeEvent::Moving {
                file_name: file_name.clone(),
                category: category.clone(),
                destination: destination.clone(),
                dry_run,
            });

            if dry_run {
                claimed.insert(destination.clone());
            } else {
                move_file(&path, &destination)?;
            }

            let record = MoveRecord {
                original_path: path,
                file_name: destination
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                new_path: destination,
                category,
            };
            if record.was_renamed() {
                log::debug!(
                    "Renamed {} to {} to avoid a collision",
                    file_name,
                    record.file_name
                );
            }
            report.moves.push(record);
        }

        log::info!(
            "Processed {}: {} file(s) {}",
            target.display(),
            report.moves.len(),
            if dry_run { "planned" } else { "moved" }
        );
        sink.emit(&OrganizeEvent::Completed {
            moved: report.moves.len(),
            dry_run,
        });

        Ok(report)
    }
}

/// Organizes `target` with the built-in category table, printing status
/// lines to the console.
pub fn organize(target: &Path) -> OrganizeResult<OrganizeReport> {
    FileOrganizer::default().run(target, &mut ConsoleSink::new())
}

/// Like [`organize`], but only reports what would be moved.
pub fn plan(target: &Path) -> OrganizeResult<OrganizeReport> {
    FileOrganizer::default()
        .with_options(OrganizeOptions {
            dry_run: true,
            ..OrganizeOptions::default()
        })
        .run(target, &mut ConsoleSink::new())
}

fn compile_patterns(patterns: &[String]) -> OrganizeResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| OrganizeError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.msg.to_string(),
            })
        })
        .collect()
}

fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Fails where [`ensure_dir`] would, without creating anything: something
/// that is not a directory already sits at `path`.
fn check_dir_creatable(path: &Path) -> OrganizeResult<()> {
    if is_occupied(path) && !path.is_dir() {
        return Err(OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a file with the category's name is in the way",
            ),
        });
    }
    Ok(())
}

/// Dangling symlinks count as occupants.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Finds the first free destination for `file_name` inside `dir`, trying
/// `stem_1.ext`, `stem_2.ext`, ... after the plain name.
fn resolve_destination(
    dir: &Path,
    file_name: &OsStr,
    mut occupied: impl FnMut(&Path) -> bool,
) -> PathBuf {
    let mut candidate = dir.join(file_name);
    let mut counter: u64 = 1;
    while occupied(&candidate) {
        candidate = dir.join(disambiguated_name(file_name, counter));
        counter += 1;
    }
    candidate
}

fn disambiguated_name(file_name: &OsStr, counter: u64) -> OsString {
    if let Some(name) = file_name.to_str() {
        let (stem, ext) = split_name(name);
        return OsString::from(format!("{}_{}{}", stem, counter, ext));
    }

    // Non UTF-8 names: split with the platform's own stem/extension rules.
    let path = Path::new(file_name);
    let mut name = path.file_stem().unwrap_or(file_name).to_os_string();
    name.push(format!("_{}", counter));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Moves `source` to `destination`, copying across devices.
///
/// The copy fallback follows symlinks: a link moved across devices arrives
/// as a regular file holding the link target's contents.
fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
    finish_move(fs::rename(source, destination), source, destination)
}

/// Turns the outcome of a rename into the move result, falling back to
/// copy-then-remove when the rename crossed devices.
fn finish_move(renamed: io::Result<()>, source: &Path, destination: &Path) -> OrganizeResult<()> {
    let failure = |e: io::Error| OrganizeError::FileMoveFailure {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source_error: e,
    };

    match renamed {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "{} is on another device, copying instead",
                destination.display()
            );
            fs::copy(source, destination).map_err(failure)?;
            fs::remove_file(source).map_err(failure)
        }
        Err(e) => Err(failure(e)),
    }
}

// src/rewrite/mod.rs

//! Transactional in-place rewrite
//!
//! Orchestrates one conversion end to end with an explicit
//! commit-or-rollback protocol:
//!
//! - Parse and map run against the original, read-only
//! - The modern document is serialized to a fresh temporary file in
//!   the same directory, flushed and fsynced before anything moves
//! - Commit is a single atomic rename over the original; when the
//!   platform refuses, or a backup is requested, the two-rename
//!   fallback runs: original -> `<name>.bak`, temporary -> original,
//!   with the backup restored if the second rename fails
//!
//! Any failure before commit leaves the original byte-for-byte
//! unchanged; the temporary is discarded on every failure path.
//!
//! # Lifecycle
//!
//! ```text
//! Idle -> Parsing -> Mapping -> Serializing -> Swapping -> Committed
//!            |          |            |            |
//!            +----------+------------+------------+--> RolledBack
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::blockfile::BlockResolver;
use crate::error::{Error, Result};
use crate::{legacy, mapper, xml};

/// Phases of one conversion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    Idle,
    Parsing,
    Mapping,
    Serializing,
    Swapping,
    Committed,
    RolledBack,
}

/// Conversion configuration.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Keep the original as `<name>.bak` next to the converted
    /// project instead of deleting it after a successful commit.
    pub keep_backup: bool,
}

/// Outcome of a successful conversion.
#[derive(Debug)]
pub struct ConversionReport {
    pub tracks: usize,
    pub clips: usize,
    pub blocks: usize,
    /// One entry per dropped legacy element worth telling the user about.
    pub warnings: Vec<String>,
    /// Set when a backup of the original remains on disk: either
    /// requested via [`ConvertOptions::keep_backup`], or left behind
    /// because it could not be removed after commit.
    pub backup_path: Option<PathBuf>,
}

/// Convert a legacy project file to the modern format, in place.
///
/// On success the file at `path` contains the modern XML document.
/// On failure the file is byte-for-byte what it was before the call
/// and the error describes the first problem encountered. The caller
/// must guarantee nothing else is writing to `path` for the duration.
pub fn convert_project_file(
    path: &Path,
    resolver: &dyn BlockResolver,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let mut phase = ConvertPhase::Idle;
    match convert_stages(path, resolver, options, &mut phase) {
        Ok(report) => {
            info!(
                path = %path.display(),
                tracks = report.tracks,
                clips = report.clips,
                blocks = report.blocks,
                "converted legacy project"
            );
            Ok(report)
        }
        Err(err) => {
            let failed_in = phase;
            phase = ConvertPhase::RolledBack;
            debug!(
                path = %path.display(),
                failed_in = ?failed_in,
                terminal = ?phase,
                error = %err,
                "conversion rolled back, original untouched"
            );
            Err(err)
        }
    }
}

fn convert_stages(
    path: &Path,
    resolver: &dyn BlockResolver,
    options: &ConvertOptions,
    phase: &mut ConvertPhase,
) -> Result<ConversionReport> {
    *phase = ConvertPhase::Parsing;
    let raw = fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);
    let legacy_root = legacy::parse_document(&text)?;

    *phase = ConvertPhase::Mapping;
    let mapped = mapper::map_document(&legacy_root, resolver)?;

    *phase = ConvertPhase::Serializing;
    let mut temp = new_temp_file(path)?;
    {
        let mut out = BufWriter::new(&mut temp);
        xml::write_document(&mapped.root, &mut out)?;
        out.flush()?;
    }
    // The temporary must be durably complete before it can replace
    // anything.
    temp.as_file().sync_all()?;

    *phase = ConvertPhase::Swapping;
    let backup_path = swap_into_place(temp, path, options)?;
    sync_parent_dir(path);

    *phase = ConvertPhase::Committed;
    Ok(ConversionReport {
        tracks: mapped.tracks,
        clips: mapped.clips,
        blocks: mapped.blocks,
        warnings: mapped.warnings,
        backup_path,
    })
}

/// Create the temporary in the original's directory so the final
/// rename never crosses a filesystem boundary.
fn new_temp_file(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("project");
    let temp = tempfile::Builder::new()
        .prefix(&format!(".{stem}."))
        .suffix(".tmp")
        .tempfile_in(dir)?;
    Ok(temp)
}

/// Commit the temporary over the original, returning the path of a
/// surviving backup if one remains.
fn swap_into_place(
    temp: NamedTempFile,
    path: &Path,
    options: &ConvertOptions,
) -> Result<Option<PathBuf>> {
    if !options.keep_backup {
        match temp.persist(path) {
            Ok(_) => return Ok(None),
            Err(persist_err) => {
                warn!(
                    path = %path.display(),
                    error = %persist_err.error,
                    "direct rename refused, falling back to backup swap"
                );
                return swap_with_backup(persist_err.file, path, false);
            }
        }
    }
    swap_with_backup(temp, path, true)
}

fn swap_with_backup(temp: NamedTempFile, path: &Path, keep: bool) -> Result<Option<PathBuf>> {
    let backup = backup_path_for(path);

    // First rename: move the original out of the way. A failure here
    // is clean; the original has not moved and the temporary is
    // dropped.
    fs::rename(path, &backup)?;

    // Second rename: move the converted document into place.
    match temp.persist(path) {
        Ok(_) => {
            if keep {
                debug!(backup = %backup.display(), "original retained as backup");
                return Ok(Some(backup));
            }
            if let Err(err) = fs::remove_file(&backup) {
                warn!(
                    backup = %backup.display(),
                    error = %err,
                    "converted, but the backup could not be removed"
                );
                return Ok(Some(backup));
            }
            Ok(None)
        }
        Err(persist_err) => {
            // Put the original back before reporting failure.
            match fs::rename(&backup, path) {
                Ok(()) => Err(Error::Io(persist_err.error)),
                Err(restore_err) => Err(Error::Io(io::Error::new(
                    persist_err.error.kind(),
                    format!(
                        "replacing {} failed ({}), and restoring the original failed ({}); \
                         the original content is preserved at {}",
                        path.display(),
                        persist_err.error,
                        restore_err,
                        backup.display()
                    ),
                ))),
            }
        }
    }
}

/// `<name>.bak` beside the original, extension appended rather than
/// replaced.
fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Persist the directory entry after commit. Not every filesystem
/// supports fsync on a directory handle; failures are ignored.
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

// src/blockfile/mod.rs

//! Block-file resolution
//!
//! A legacy project does not carry audio samples; it points at block
//! files held out-of-band in the project data directory, and at
//! aliased audio files elsewhere on disk. Losing such a reference
//! silently would corrupt the user's audio on the next load, so the
//! mapper confirms every reference through a [`BlockResolver`] before
//! anything is written.

use std::path::{Path, PathBuf};

use tracing::debug;

/// File extension of Soundwell block files on disk.
pub const BLOCK_EXTENSION: &str = "swb";

/// Resolves references to external audio block data.
///
/// Implementations must be read-only: resolution runs during mapping,
/// while the original project file is still the only copy.
pub trait BlockResolver {
    /// Resolve a project block-file id (e.g. `block007`) to its
    /// on-disk path, or `None` when the reference cannot be satisfied.
    fn resolve(&self, file_id: &str) -> Option<PathBuf>;

    /// Resolve the target of an alias block: an absolute path, or a
    /// bare file name located in the project data directory.
    fn resolve_alias(&self, path: &str) -> Option<PathBuf>;
}

/// Production resolver: block files live flat in the project data
/// directory as `<id>.swb`.
#[derive(Debug, Clone)]
pub struct DirectoryBlockStore {
    data_dir: PathBuf,
}

impl DirectoryBlockStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Ids come from an untrusted project file; reject anything that
    /// could reach outside the data directory.
    fn is_safe_name(name: &str) -> bool {
        !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
    }
}

impl BlockResolver for DirectoryBlockStore {
    fn resolve(&self, file_id: &str) -> Option<PathBuf> {
        if !Self::is_safe_name(file_id) {
            debug!(file_id, "rejected unsafe block id");
            return None;
        }
        let path = self.data_dir.join(format!("{file_id}.{BLOCK_EXTENSION}"));
        path.is_file().then_some(path)
    }

    fn resolve_alias(&self, alias: &str) -> Option<PathBuf> {
        let candidate = Path::new(alias);
        if candidate.is_absolute() {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }
        // Projects moved between machines often keep only the file
        // name of the aliased audio; look for it next to the blocks.
        if !Self::is_safe_name(alias) {
            debug!(alias, "rejected unsafe alias path");
            return None;
        }
        let path = self.data_dir.join(candidate);
        path.is_file().then_some(path)
    }
}

//! Build script files on disk.
//!
//! A [`BuildScript`] remembers an xxh3 fingerprint of the bytes it was loaded
//! from. Saving re-checks that fingerprint so a file edited by someone else in
//! the meantime is never overwritten, then writes atomically.

use crate::inject::{Dialect, InjectError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};
use xxhash_rust::xxh3::xxh3_64;

/// Directories that never hold build scripts worth touching.
pub const SKIPPED_DIRS: &[&str] = &["build", ".gradle", "buildSrc", ".git", ".idea", "node_modules"];

const MAX_DISCOVERY_DEPTH: usize = 8;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Utf8 { path: PathBuf },

    #[error("{path} changed on disk since it was read; refusing to overwrite")]
    ConcurrentModification { path: PathBuf },

    #[error("no build.gradle or build.gradle.kts in {dir}")]
    NotFound { dir: PathBuf },

    #[error("failed to walk {dir}: {source}")]
    Walk {
        dir: PathBuf,
        source: walkdir::Error,
    },

    #[error(transparent)]
    Dialect(#[from] InjectError),
}

/// Result of saving a build script.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "WriteResult should be checked for written/unchanged"]
pub enum WriteResult {
    Written { path: PathBuf, bytes: usize },
    /// New content equals what was loaded; nothing was written
    Unchanged { path: PathBuf },
}

/// A build script loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildScript {
    path: PathBuf,
    dialect: Dialect,
    content: String,
    fingerprint: u64,
}

impl BuildScript {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ScriptError> {
        let path = path.into();
        let dialect = Dialect::from_path(&path)?;
        let bytes = read(&path)?;
        let fingerprint = xxh3_64(&bytes);
        let content =
            String::from_utf8(bytes).map_err(|_| ScriptError::Utf8 { path: path.clone() })?;

        tracing::debug!(path = %path.display(), %dialect, bytes = content.len(), "loaded build script");
        Ok(Self {
            path,
            dialect,
            content,
            fingerprint,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the file's content with `new_content`.
    ///
    /// Uses tempfile + fsync + rename for crash safety.
    pub fn save(&self, new_content: &str) -> Result<WriteResult, ScriptError> {
        if new_content == self.content {
            return Ok(WriteResult::Unchanged {
                path: self.path.clone(),
            });
        }

        let on_disk = read(&self.path)?;
        if xxh3_64(&on_disk) != self.fingerprint {
            return Err(ScriptError::ConcurrentModification {
                path: self.path.clone(),
            });
        }

        atomic_write(&self.path, new_content.as_bytes()).map_err(|source| ScriptError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), bytes = new_content.len(), "wrote build script");
        Ok(WriteResult::Written {
            path: self.path.clone(),
            bytes: new_content.len(),
        })
    }
}

fn read(path: &Path) -> Result<Vec<u8>, ScriptError> {
    fs::read(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Same directory as the target so the rename stays on one filesystem
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Path has no parent directory",
        )
    })?;
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// The root build script of the project in `dir`.
///
/// The Kotlin script wins when both exist.
pub fn find_root_build_script(dir: &Path) -> Result<PathBuf, ScriptError> {
    [Dialect::Kotlin, Dialect::Groovy]
        .into_iter()
        .map(|dialect| dir.join(dialect.build_file_name()))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ScriptError::NotFound {
            dir: dir.to_path_buf(),
        })
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Every `build.gradle` / `build.gradle.kts` under `root`, sorted by path.
pub fn discover_build_scripts(root: &Path) -> Result<Vec<PathBuf>, ScriptError> {
    let mut scripts = Vec::new();
    let walker = WalkDir::new(root)
        .max_depth(MAX_DISCOVERY_DEPTH)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry));

    for entry in walker {
        let entry = entry.map_err(|source| ScriptError::Walk {
            dir: root.to_path_buf(),
            source,
        })?;
        let is_build_script = entry.file_type().is_file()
            && [Dialect::Groovy, Dialect::Kotlin]
                .iter()
                .any(|dialect| entry.file_name() == dialect.build_file_name());
        if is_build_script {
            scripts.push(entry.into_path());
        }
    }

    scripts.sort();
    Ok(scripts)
}

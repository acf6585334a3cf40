//! Installing generated data into a tinydns root.
//!
//! The `data` file is replaced atomically: the new contents are written to a
//! temporary file in the root and renamed over the old file, so tinydns-data
//! never sees a half-written file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Name of the source file tinydns-data compiles.
pub const DATA_FILE: &str = "data";
/// Suffix of static fragments picked up from the root by default.
pub const STATIC_SUFFIX: &str = ".static";
/// Program that compiles `data` into `data.cdb`.
pub const TINYDNS_DATA: &str = "tinydns-data";

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("tinydns root {0} is not a directory")]
    MissingRoot(String),
    #[error("failed to list {path}: {source}")]
    List {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to run {program} in {root}: {source}")]
    Spawn {
        program: String,
        root: String,
        source: std::io::Error,
    },
    #[error("{program} failed in {root}: {status}")]
    Failed {
        program: String,
        root: String,
        status: ExitStatus,
    },
}

/// Static fragments in `root`, sorted by file name.
///
/// A root that does not exist yields no fragments.
pub fn discover_static_files(root: &Path) -> Result<Vec<PathBuf>, MergeError> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let list_err = |source| MergeError::List {
        path: root.display().to_string(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(STATIC_SUFFIX) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names.into_iter().map(|name| root.join(name)).collect())
}

/// Replace `root/data` with `contents`.
pub fn write_data(root: &Path, contents: &str) -> Result<PathBuf, MergeError> {
    if !root.is_dir() {
        return Err(MergeError::MissingRoot(root.display().to_string()));
    }
    let target = root.join(DATA_FILE);
    let write_err = |source| MergeError::Write {
        path: target.display().to_string(),
        source,
    };

    let mut staged = NamedTempFile::new_in(root).map_err(write_err)?;
    staged.write_all(contents.as_bytes()).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    staged.persist(&target).map_err(|err| write_err(err.error))?;

    info!(path = %target.display(), bytes = contents.len(), "wrote tinydns data");
    Ok(target)
}

/// Compile `root/data` by running `program` inside `root`.
pub fn compile_data(root: &Path, program: &str) -> Result<(), MergeError> {
    debug!(program, root = %root.display(), "compiling tinydns data");
    let status = Command::new(program)
        .current_dir(root)
        .status()
        .map_err(|source| MergeError::Spawn {
            program: program.to_string(),
            root: root.display().to_string(),
            source,
        })?;

    if !status.success() {
        return Err(MergeError::Failed {
            program: program.to_string(),
            root: root.display().to_string(),
            status,
        });
    }
    Ok(())
}

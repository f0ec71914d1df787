//! Staged output files.
//!
//! Bytes are written to a hidden sibling file and renamed into place on
//! commit, so a destination path either holds complete content or is left
//! untouched. An uncommitted stage removes its sibling when dropped.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use wind_common::{WindError, WindResult};

/// Fully written content waiting to be renamed onto its destination.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    destination: PathBuf,
}

impl StagedFile {
    /// Final path this stage will be committed to.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Rename the staged content onto the destination.
    pub fn commit(self) -> WindResult<PathBuf> {
        let StagedFile { file, destination } = self;
        file.persist(&destination)
            .map_err(|e| WindError::Io(e.error))?;
        Ok(destination)
    }
}

fn parent_dir(destination: &Path) -> &Path {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `bytes` next to `destination` without touching the destination yet.
pub fn stage(destination: &Path, bytes: &[u8]) -> WindResult<StagedFile> {
    let mut file = tempfile::Builder::new()
        .prefix(".wind-")
        .suffix(".partial")
        .tempfile_in(parent_dir(destination))?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;

    Ok(StagedFile {
        file,
        destination: destination.to_path_buf(),
    })
}

/// Stage and commit in one step.
pub fn write_atomic(destination: &Path, bytes: &[u8]) -> WindResult<()> {
    stage(destination, bytes)?.commit().map(|_| ())
}

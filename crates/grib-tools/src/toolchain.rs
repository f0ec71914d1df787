//! External grid toolchain.
//!
//! The pipeline only depends on [`GridToolchain`]; [`EccodesToolchain`] is the
//! production implementation that shells out to the ecCodes utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};
use wind_common::{GridRecord, WindError, WindResult};

use crate::dump::{decode_record, StructuredDump};

/// Capability to canonicalize a grid file and dump it as structured data.
#[async_trait]
pub trait GridToolchain: Send + Sync {
    /// Rewrite the file at `path` in place into simple packing.
    async fn normalize_in_place(&self, path: &Path) -> WindResult<()>;

    /// Serialize the (normalized) grid file into a structured dump.
    async fn dump(&self, path: &Path) -> WindResult<StructuredDump>;

    /// Normalize, dump and decode one grid file.
    async fn load_record(&self, path: &Path) -> WindResult<GridRecord> {
        self.normalize_in_place(path).await?;
        let dump = self.dump(path).await?;
        decode_record(&dump)
    }
}

/// Toolchain backed by the ecCodes `grib_set` and `grib_dump` executables.
#[derive(Debug, Clone)]
pub struct EccodesToolchain {
    grib_set: PathBuf,
    grib_dump: PathBuf,
    timeout: Duration,
}

impl Default for EccodesToolchain {
    fn default() -> Self {
        Self {
            grib_set: PathBuf::from("grib_set"),
            grib_dump: PathBuf::from("grib_dump"),
            timeout: Duration::from_secs(300),
        }
    }
}

impl EccodesToolchain {
    /// Create a toolchain using explicit executable paths.
    pub fn new(grib_set: impl Into<PathBuf>, grib_dump: impl Into<PathBuf>) -> Self {
        Self {
            grib_set: grib_set.into(),
            grib_dump: grib_dump.into(),
            ..Self::default()
        }
    }

    /// Upper bound on each tool invocation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run<I, S>(&self, program: &Path, args: I) -> WindResult<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let tool = program.display().to_string();
        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                WindError::tool(&tool, format!("timed out after {:?}", self.timeout))
            })?
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    WindError::tool(&tool, "executable not found; is ecCodes installed?")
                }
                _ => WindError::tool(&tool, format!("failed to start: {}", e)),
            })?;

        if !output.status.success() {
            return Err(WindError::tool(
                &tool,
                format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        Ok(output)
    }
}

#[async_trait]
impl GridToolchain for EccodesToolchain {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn normalize_in_place(&self, path: &Path) -> WindResult<()> {
        // grib_set -r -s packingType=grid_simple <in> <out>, with in == out
        self.run(
            &self.grib_set,
            [
                OsStr::new("-r"),
                OsStr::new("-s"),
                OsStr::new("packingType=grid_simple"),
                path.as_os_str(),
                path.as_os_str(),
            ],
        )
        .await?;
        debug!("Normalized grid packing");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn dump(&self, path: &Path) -> WindResult<StructuredDump> {
        let output = self
            .run(&self.grib_dump, [OsStr::new("-j"), path.as_os_str()])
            .await?;
        debug!(bytes = output.stdout.len(), "Dumped grid as JSON");
        StructuredDump::from_slice(&output.stdout)
    }
}

//! fetch -> normalize -> decode -> compose -> encode.
//!
//! Components are processed one after another. Each downloaded grid lives in
//! a scratch file next to the output texture that is removed when the run
//! ends, whether it succeeded or not. The texture and descriptor are staged
//! in full before either is renamed into place, so a failed run leaves
//! neither behind.

use std::path::PathBuf;

use grib_tools::GridToolchain;
use renderer::{compose, create_png_rgb, render_scene, stage};
use tempfile::TempPath;
use tracing::{info, instrument, warn};
use wind_common::{Component, GridRecord, WindResult};

use crate::config::PipelineConfig;
use crate::fetch::GridFetcher;

/// Files produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub texture: PathBuf,
    pub descriptor: Option<PathBuf>,
    pub width: usize,
    pub height: usize,
}

/// Download and decode one component into a record.
///
/// The scratch guard is pushed before the download starts so a partially
/// written file is still removed.
#[instrument(skip_all, fields(component = %component))]
async fn load_component(
    config: &PipelineConfig,
    component: Component,
    fetcher: &dyn GridFetcher,
    toolchain: &dyn GridToolchain,
    scratch: &mut Vec<TempPath>,
) -> WindResult<GridRecord> {
    let url = config.url_for(component);
    let path = config.scratch_path(component);
    scratch.push(TempPath::try_from_path(&path)?);

    info!(url = %url, "Downloading");
    let bytes = fetcher.fetch(&url, &path).await?;

    let record = toolchain.load_record(&path).await?;
    info!(
        bytes,
        width = record.width(),
        height = record.height(),
        "Decoded component grid"
    );
    Ok(record)
}

async fn run_inner(
    config: &PipelineConfig,
    fetcher: &dyn GridFetcher,
    toolchain: &dyn GridToolchain,
    scratch: &mut Vec<TempPath>,
) -> WindResult<PipelineOutput> {
    let east = load_component(config, Component::East, fetcher, toolchain, scratch).await?;
    let north = load_component(config, Component::North, fetcher, toolchain, scratch).await?;

    let texture = compose(east, north)?;
    let png = create_png_rgb(texture.as_rgb(), texture.width(), texture.height())?;
    let staged_texture = stage(&config.texture_path, &png)?;

    let staged_descriptor = match &config.descriptor {
        Some(descriptor) => {
            let texture_ref = config.texture_path.to_string_lossy();
            let document = render_scene(&texture_ref, &descriptor.options);
            Some(stage(&descriptor.path, document.as_bytes())?)
        }
        None => None,
    };

    let texture_path = staged_texture.commit()?;
    info!(path = %texture_path.display(), "Wrote");

    let descriptor = match staged_descriptor {
        Some(staged) => match staged.commit() {
            Ok(path) => {
                info!(path = %path.display(), "Wrote");
                Some(path)
            }
            Err(e) => {
                if let Err(remove) = std::fs::remove_file(&texture_path) {
                    warn!(path = %texture_path.display(), error = %remove, "Failed to remove texture");
                }
                return Err(e);
            }
        },
        None => None,
    };

    Ok(PipelineOutput {
        texture: texture_path,
        descriptor,
        width: texture.width(),
        height: texture.height(),
    })
}

/// Run the whole pipeline once.
///
/// Scratch files are deleted before this returns on every path.
pub async fn run(
    config: &PipelineConfig,
    fetcher: &dyn GridFetcher,
    toolchain: &dyn GridToolchain,
) -> WindResult<PipelineOutput> {
    let mut scratch = Vec::with_capacity(Component::ALL.len());
    let result = run_inner(config, fetcher, toolchain, &mut scratch).await;

    for path in scratch {
        let shown = path.display().to_string();
        if let Err(e) = path.close() {
            // fetch failed before creating the file
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %shown, error = %e, "Failed to remove scratch file");
            }
        }
    }

    result
}

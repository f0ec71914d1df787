//! Wind velocity texture generator.
//!
//! Downloads GFS 10 m wind components from the NOMADS GRIB filter, normalizes
//! them with ecCodes and writes an RGB velocity texture, plus an optional
//! `.earth` scene descriptor.
//!
//! Requires the ecCodes `grib_set` and `grib_dump` utilities on `PATH` (or
//! set `GRIB_SET` / `GRIB_DUMP`).

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use wind_texture::{pipeline, Args, HttpGridFetcher};

fn init_tracing(level: Level, json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.log_level(), args.log_json)?;

    let config = args.pipeline_config();
    debug!(?config, "Resolved configuration");

    let fetcher =
        HttpGridFetcher::new(&args.fetch_config()).context("Failed to create HTTP client")?;
    let toolchain = args.toolchain();

    match pipeline::run(&config, &fetcher, &toolchain).await {
        Ok(output) => {
            debug!(
                width = output.width,
                height = output.height,
                "Velocity texture complete"
            );
            Ok(())
        }
        Err(e) => Err(e).context(format!(
            "Failed to generate {}",
            config.texture_path.display()
        )),
    }
}

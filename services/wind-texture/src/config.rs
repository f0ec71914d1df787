//! Command line arguments and the pipeline configuration derived from them.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use grib_tools::EccodesToolchain;
use renderer::SceneOptions;
use tracing::Level;
use wind_common::request::{parse_date, DEFAULT_BASE_URL};
use wind_common::{Component, Cycle, ForecastRequest, Resolution};

#[derive(Parser, Debug, Clone)]
#[command(name = "wind-texture")]
#[command(about = "Generate a wind velocity texture from the NWS GRIB service")]
pub struct Args {
    /// Date, in the format YYYYMMDD such as 20201110 (default: today, UTC)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// UTC hour, either 00, 06, 12, or 18
    #[arg(short = 't', long = "time", default_value = "00")]
    pub cycle: Cycle,

    /// Resolution, either 1p00, 0p50, or 0p25
    #[arg(short, long, default_value = "1p00")]
    pub resolution: Resolution,

    /// Write an earth file to this path
    #[arg(short, long)]
    pub earth: Option<PathBuf>,

    /// Earth file written will not include base map. Implies -e
    #[arg(short = 'x', long)]
    pub exclude_base_map: bool,

    /// Earth file written will show points instead of sprites. Implies -e
    #[arg(short, long)]
    pub points: bool,

    /// Earth file written will show sprites instead of points. Implies -e
    #[arg(short, long)]
    pub sprites: bool,

    /// Do not print success messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Output texture file (default: nws_<date>_<hour>z_<resolution>.png)
    pub file: Option<PathBuf>,

    /// GRIB filter service host
    #[arg(long, env = "WIND_TEXTURE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path to the ecCodes grib_set executable
    #[arg(long, env = "GRIB_SET", default_value = "grib_set")]
    pub grib_set: PathBuf,

    /// Path to the ecCodes grib_dump executable
    #[arg(long, env = "GRIB_DUMP", default_value = "grib_dump")]
    pub grib_dump: PathBuf,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "300")]
    pub request_timeout_secs: u64,

    /// Timeout for each ecCodes invocation in seconds
    #[arg(long, default_value = "300")]
    pub tool_timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

/// Where and how to write the scene descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorConfig {
    pub path: PathBuf,
    pub options: SceneOptions,
}

/// Everything one pipeline run needs, fixed before the run starts.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub request: ForecastRequest,
    pub base_url: String,
    pub texture_path: PathBuf,
    pub descriptor: Option<DescriptorConfig>,
}

impl PipelineConfig {
    /// Config for `request` with default output naming and no descriptor.
    pub fn new(request: ForecastRequest) -> Self {
        Self {
            texture_path: PathBuf::from(request.default_texture_name()),
            request,
            base_url: DEFAULT_BASE_URL.to_string(),
            descriptor: None,
        }
    }

    /// Filter service URL for one component.
    pub fn url_for(&self, component: Component) -> String {
        self.request.filter_url(&self.base_url, component)
    }

    /// Scratch file for a downloaded component, e.g. `wind.png.u.grb`.
    pub fn scratch_path(&self, component: Component) -> PathBuf {
        let mut name: OsString = self.texture_path.as_os_str().to_owned();
        name.push(format!(".{}.grb", component.suffix()));
        PathBuf::from(name)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Default descriptor path: the texture path with an `.earth` extension.
pub fn default_descriptor_path(texture: &Path) -> PathBuf {
    texture.with_extension("earth")
}

impl Args {
    /// Whether any flag asks for a scene descriptor.
    pub fn wants_descriptor(&self) -> bool {
        self.earth.is_some() || self.points || self.sprites || self.exclude_base_map
    }

    /// Build the pipeline configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let request = ForecastRequest::new(
            self.date.unwrap_or_else(|| ForecastRequest::today().date),
            self.cycle,
            self.resolution,
        );

        let texture_path = self
            .file
            .clone()
            .unwrap_or_else(|| PathBuf::from(request.default_texture_name()));

        let descriptor = self.wants_descriptor().then(|| DescriptorConfig {
            path: self
                .earth
                .clone()
                .unwrap_or_else(|| default_descriptor_path(&texture_path)),
            options: SceneOptions {
                // Sprites unless points were asked for and sprites were not
                use_sprites: self.sprites || !self.points,
                exclude_base_map: self.exclude_base_map,
            },
        });

        PipelineConfig {
            request,
            base_url: self.base_url.clone(),
            texture_path,
            descriptor,
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchConfig::default()
        }
    }

    pub fn toolchain(&self) -> EccodesToolchain {
        EccodesToolchain::new(&self.grib_set, &self.grib_dump)
            .with_timeout(Duration::from_secs(self.tool_timeout_secs))
    }

    /// Effective log level; quiet mode hides progress messages.
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("wind-texture").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["-d", "20201110"]);
        let config = args.pipeline_config();

        assert_eq!(config.request.cycle, Cycle::H00);
        assert_eq!(config.request.resolution, Resolution::OneDegree);
        assert_eq!(config.texture_path, PathBuf::from("nws_20201110_00z_1p00.png"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.descriptor.is_none());
        assert_eq!(args.log_level(), Level::INFO);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let argv = |a: &[&'static str]| {
            Args::try_parse_from(std::iter::once("wind-texture").chain(a.iter().copied()))
        };
        assert!(argv(&["-t", "03"]).is_err());
        assert!(argv(&["-r", "2p00"]).is_err());
        assert!(argv(&["-d", "2020-11-10"]).is_err());
    }

    #[test]
    fn test_explicit_output_file() {
        let config = parse(&["-d", "20201110", "-t", "12", "-r", "0p25", "out/wind.png"])
            .pipeline_config();
        assert_eq!(config.texture_path, PathBuf::from("out/wind.png"));
        assert_eq!(
            config.scratch_path(Component::East),
            PathBuf::from("out/wind.png.u.grb")
        );
        assert_eq!(
            config.scratch_path(Component::North),
            PathBuf::from("out/wind.png.v.grb")
        );
        assert!(config.url_for(Component::North).contains("filter_gfs_0p25.pl"));
    }

    #[test]
    fn test_descriptor_flags() {
        // Each of -p, -s, -x on its own requests a descriptor
        for flag in ["-p", "-s", "-x"] {
            let config = parse(&["-d", "20201110", flag]).pipeline_config();
            let descriptor = config.descriptor.expect(flag);
            assert_eq!(descriptor.path, PathBuf::from("nws_20201110_00z_1p00.earth"));
        }

        let config = parse(&["-d", "20201110", "-e", "scene.earth", "wind.png"]).pipeline_config();
        assert_eq!(config.descriptor.unwrap().path, PathBuf::from("scene.earth"));
    }

    #[test]
    fn test_sprite_selection() {
        let sprites = |a: &[&str]| {
            parse(a)
                .pipeline_config()
                .descriptor
                .unwrap()
                .options
                .use_sprites
        };
        assert!(sprites(&["-x"]));
        assert!(sprites(&["-s"]));
        assert!(!sprites(&["-p"]));
        assert!(sprites(&["-p", "-s"]));
    }

    #[test]
    fn test_quiet_raises_log_level() {
        let args = parse(&["-q", "--log-level", "debug"]);
        assert_eq!(args.log_level(), Level::WARN);
    }

    #[test]
    fn test_default_descriptor_path() {
        assert_eq!(
            default_descriptor_path(Path::new("a/b.tar.png")),
            PathBuf::from("a/b.tar.earth")
        );
        assert_eq!(default_descriptor_path(Path::new("wind")), PathBuf::from("wind.earth"));
    }
}

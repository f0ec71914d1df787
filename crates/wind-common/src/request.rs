//! Forecast request parameters and NOMADS filter URL construction.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WindError;
use crate::grid::Component;

/// Default NOMADS host.
pub const DEFAULT_BASE_URL: &str = "https://nomads.ncep.noaa.gov";

/// Fixed vertical level: 10 m above ground.
pub const LEVEL_SELECTOR: &str = "lev_10_m_above_ground=on";

/// GFS model cycle (UTC hour of the run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cycle {
    #[default]
    H00,
    H06,
    H12,
    H18,
}

impl Cycle {
    /// Two-digit hour string, e.g. "06".
    pub fn as_str(&self) -> &'static str {
        match self {
            Cycle::H00 => "00",
            Cycle::H06 => "06",
            Cycle::H12 => "12",
            Cycle::H18 => "18",
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cycle {
    type Err = WindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "00" => Ok(Cycle::H00),
            "06" => Ok(Cycle::H06),
            "12" => Ok(Cycle::H12),
            "18" => Ok(Cycle::H18),
            other => Err(WindError::InvalidRequest(format!(
                "UTC hour must be one of 00, 06, 12, 18; got '{}'",
                other
            ))),
        }
    }
}

/// GFS grid resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// 1.00 degree (360x181)
    #[default]
    OneDegree,
    /// 0.50 degree (720x361)
    HalfDegree,
    /// 0.25 degree (1440x721)
    QuarterDegree,
}

impl Resolution {
    /// Token used by NOMADS in script and file names, e.g. "0p25".
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::OneDegree => "1p00",
            Resolution::HalfDegree => "0p50",
            Resolution::QuarterDegree => "0p25",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = WindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1p00" => Ok(Resolution::OneDegree),
            "0p50" => Ok(Resolution::HalfDegree),
            "0p25" => Ok(Resolution::QuarterDegree),
            other => Err(WindError::InvalidRequest(format!(
                "resolution must be one of 1p00, 0p50, 0p25; got '{}'",
                other
            ))),
        }
    }
}

/// Parse a `YYYYMMDD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, WindError> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WindError::InvalidRequest(format!(
            "date must be YYYYMMDD; got '{}'",
            s
        )));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .map_err(|e| WindError::InvalidRequest(format!("invalid date '{}': {}", s, e)))
}

/// One model run to fetch: date, cycle and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub date: NaiveDate,
    pub cycle: Cycle,
    pub resolution: Resolution,
}

impl ForecastRequest {
    pub fn new(date: NaiveDate, cycle: Cycle, resolution: Resolution) -> Self {
        Self {
            date,
            cycle,
            resolution,
        }
    }

    /// Request for today's (UTC) 00z 1-degree analysis.
    pub fn today() -> Self {
        Self::new(Utc::now().date_naive(), Cycle::default(), Resolution::default())
    }

    /// Date formatted as `YYYYMMDD`.
    pub fn date_token(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// URL of the GRIB filter service for one component of the analysis (f000).
    pub fn filter_url(&self, base_url: &str, component: Component) -> String {
        let res = self.resolution.as_str();
        let hour = self.cycle.as_str();
        format!(
            "{}/cgi-bin/filter_gfs_{res}.pl?file=gfs.t{hour}z.pgrb2.{res}.f000&{}&dir=%2Fgfs.{}%2F{hour}&var_{}=on",
            base_url.trim_end_matches('/'),
            LEVEL_SELECTOR,
            self.date_token(),
            component.grib_variable(),
        )
    }

    /// Default texture file name, e.g. `nws_20201110_00z_1p00.png`.
    pub fn default_texture_name(&self) -> String {
        format!(
            "nws_{}_{}z_{}.png",
            self.date_token(),
            self.cycle,
            self.resolution
        )
    }
}

//! Common test fixtures for wind texture tests.

/// GFS global grid sizes as (Ni, Nj) per resolution token.
pub mod grid {
    /// 1.00 degree
    pub const GFS_1P00: (usize, usize) = (360, 181);

    /// 0.50 degree
    pub const GFS_0P50: (usize, usize) = (720, 361);

    /// 0.25 degree
    pub const GFS_0P25: (usize, usize) = (1440, 721);

    /// Small grid with an odd width, for the dateline shift edge case
    pub const ODD_5X3: (usize, usize) = (5, 3);
}

/// Request parameters used across tests.
pub mod request {
    /// A fixed analysis date (YYYYMMDD)
    pub const DATE: &str = "20201110";

    /// GFS model run times
    pub const GFS_CYCLES: [&str; 4] = ["00", "06", "12", "18"];

    /// Resolution tokens accepted by the filter service
    pub const RESOLUTIONS: [&str; 3] = ["1p00", "0p50", "0p25"];
}

/// Fixed normalization bounds, in m/s.
pub mod wind {
    pub const MIN: f64 = -25.0;
    pub const MAX: f64 = 25.0;
}

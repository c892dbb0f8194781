use super::{float_or_dnu, PvtError, PvtModeFlags, PvtSolution};

sbf_block! {
    /// Position, velocity and time in geodetic coordinates (block 4007)
    PvtGeodetic, number = 4007, len = 96 {
        /// Receiver time of week (ms)
        8 => tow: u32,
        /// Continuous GPS week number
        12 => wnc: u16,
        /// Solution type and flags, see [`PvtSolution`] and [`PvtModeFlags`]
        14 => mode: u8,
        15 => error: u8,
        /// Latitude (rad)
        16 => latitude: f64,
        /// Longitude (rad)
        24 => longitude: f64,
        /// Ellipsoidal height (m)
        32 => height: f64,
        /// Geoid undulation (m)
        40 => undulation: f32,
        /// Velocity north (m/s)
        44 => vn: f32,
        /// Velocity east (m/s)
        48 => ve: f32,
        /// Velocity up (m/s)
        52 => vu: f32,
        /// Course over ground (deg)
        56 => cog: f32,
        /// Receiver clock bias (ms)
        60 => rx_clk_bias: f64,
        /// Receiver clock drift (ppm)
        68 => rx_clk_drift: f32,
        72 => time_system: u8,
        73 => datum: u8,
        /// Satellites used in the solution
        74 => nr_sv: u8,
        75 => wa_corr_info: u8,
        76 => reference_id: u16,
        /// Mean age of differential corrections (0.01 s)
        78 => mean_corr_age: u16,
        80 => signal_info: u32,
        84 => alert_flag: u8,
        85 => nr_bases: u8,
        86 => ppp_info: u16,
        /// Output latency (0.0001 s)
        88 => latency: u16,
        /// Horizontal accuracy, 2DRMS (0.01 m)
        90 => h_accuracy: u16,
        /// Vertical accuracy, 2-sigma (0.01 m)
        92 => v_accuracy: u16,
        94 => misc: u8,
        95 => reserved: u8,
    }
}

impl PvtGeodetic {
    pub const fn solution(&self) -> PvtSolution {
        PvtSolution::from_mode(self.mode)
    }

    pub const fn mode_flags(&self) -> PvtModeFlags {
        PvtModeFlags::from_mode(self.mode)
    }

    pub fn error_code(&self) -> PvtError {
        PvtError::from(self.error)
    }

    pub fn latitude_degrees(&self) -> Option<f64> {
        float_or_dnu(self.latitude).map(f64::to_degrees)
    }

    pub fn longitude_degrees(&self) -> Option<f64> {
        float_or_dnu(self.longitude).map(f64::to_degrees)
    }

    pub fn height_meters(&self) -> Option<f64> {
        float_or_dnu(self.height)
    }

    /// Course over ground, `None` while stationary or without a fix.
    pub fn course_degrees(&self) -> Option<f32> {
        float_or_dnu(self.cog)
    }

    /// Horizontal speed from the north and east velocity (m/s).
    pub fn horizontal_speed(&self) -> Option<f32> {
        let vn = float_or_dnu(self.vn)?;
        let ve = float_or_dnu(self.ve)?;
        Some(vn.hypot(ve))
    }
}

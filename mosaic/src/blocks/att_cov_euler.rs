use super::float_or_dnu;

sbf_block! {
    /// Covariance of the Euler attitude angles (block 5939), in deg²
    AttCovEuler, number = 5939, len = 40 {
        8 => tow: u32,
        12 => wnc: u16,
        14 => reserved: u8,
        15 => error: u8,
        16 => cov_headhead: f32,
        20 => cov_pitchpitch: f32,
        24 => cov_rollroll: f32,
        28 => cov_headpitch: f32,
        32 => cov_headroll: f32,
        36 => cov_pitchroll: f32,
    }
}

impl AttCovEuler {
    /// Standard deviations of heading, pitch and roll (deg).
    pub fn std_devs(&self) -> Option<[f64; 3]> {
        Some([
            f64::from(float_or_dnu(self.cov_headhead)?).sqrt(),
            f64::from(float_or_dnu(self.cov_pitchpitch)?).sqrt(),
            f64::from(float_or_dnu(self.cov_rollroll)?).sqrt(),
        ])
    }
}

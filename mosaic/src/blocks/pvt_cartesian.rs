use super::{float_or_dnu, PvtError, PvtSolution};

sbf_block! {
    /// Position, velocity and time in ECEF coordinates (block 4006)
    PvtCartesian, number = 4006, len = 96 {
        8 => tow: u32,
        12 => wnc: u16,
        14 => mode: u8,
        15 => error: u8,
        /// ECEF X (m)
        16 => x: f64,
        /// ECEF Y (m)
        24 => y: f64,
        /// ECEF Z (m)
        32 => z: f64,
        40 => undulation: f32,
        /// ECEF velocity (m/s)
        44 => vx: f32,
        48 => vy: f32,
        52 => vz: f32,
        56 => cog: f32,
        60 => rx_clk_bias: f64,
        68 => rx_clk_drift: f32,
        72 => time_system: u8,
        73 => datum: u8,
        74 => nr_sv: u8,
        75 => wa_corr_info: u8,
        76 => reference_id: u16,
        78 => mean_corr_age: u16,
        80 => signal_info: u32,
        84 => alert_flag: u8,
        85 => nr_bases: u8,
        86 => ppp_info: u16,
        88 => latency: u16,
        90 => h_accuracy: u16,
        92 => v_accuracy: u16,
        94 => misc: u8,
        95 => reserved: u8,
    }
}

impl PvtCartesian {
    pub const fn solution(&self) -> PvtSolution {
        PvtSolution::from_mode(self.mode)
    }

    pub fn error_code(&self) -> PvtError {
        PvtError::from(self.error)
    }

    /// ECEF position (m), `None` without a fix.
    pub fn position(&self) -> Option<[f64; 3]> {
        Some([
            float_or_dnu(self.x)?,
            float_or_dnu(self.y)?,
            float_or_dnu(self.z)?,
        ])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::blocks::SbfBlock;

    #[test]
    fn ecef_position() {
        let block = PvtCartesian {
            tow: 1000,
            mode: 1,
            x: 4_027_893.6,
            y: 307_045.1,
            z: 4_919_474.9,
            ..Default::default()
        };
        let parsed = PvtCartesian::parse(&block.to_bytes()).unwrap();
        assert_eq!(parsed.position(), Some([4_027_893.6, 307_045.1, 4_919_474.9]));
        assert_eq!(parsed.solution(), PvtSolution::StandAlone);

        let no_fix = PvtCartesian {
            x: -2e10,
            ..block
        };
        assert_eq!(no_fix.position(), None);
    }
}

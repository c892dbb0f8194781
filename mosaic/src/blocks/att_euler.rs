use super::{float_or_dnu, AttitudeMode};

sbf_block! {
    /// Attitude as Euler angles (block 5938)
    AttEuler, number = 5938, len = 44 {
        8 => tow: u32,
        12 => wnc: u16,
        /// Satellites used for the attitude
        14 => nr_sv: u8,
        15 => error: u8,
        16 => mode: u16,
        18 => reserved: u16,
        /// Heading (deg)
        20 => heading: f32,
        /// Pitch (deg)
        24 => pitch: f32,
        /// Roll (deg)
        28 => roll: f32,
        /// Angular rates (deg/s)
        32 => pitch_dot: f32,
        36 => roll_dot: f32,
        40 => heading_dot: f32,
    }
}

impl AttEuler {
    pub fn attitude_mode(&self) -> AttitudeMode {
        AttitudeMode::from(self.mode)
    }

    pub fn heading_degrees(&self) -> Option<f32> {
        float_or_dnu(self.heading)
    }

    pub fn pitch_degrees(&self) -> Option<f32> {
        float_or_dnu(self.pitch)
    }

    pub fn roll_degrees(&self) -> Option<f32> {
        float_or_dnu(self.roll)
    }
}

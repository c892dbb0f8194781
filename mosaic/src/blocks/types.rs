use bitflags::bitflags;

/// Solution type from the low nibble of the PVT `Mode` byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PvtSolution {
    NoPvt,
    StandAlone,
    Dgnss,
    FixedLocation,
    RtkFixed,
    RtkFloat,
    Sbas,
    MovingBaseRtkFixed,
    MovingBaseRtkFloat,
    Ppp,
    Unknown(u8),
}

impl PvtSolution {
    const TYPE_MASK: u8 = 0x0f;

    pub const fn from_mode(mode: u8) -> Self {
        match mode & Self::TYPE_MASK {
            0 => Self::NoPvt,
            1 => Self::StandAlone,
            2 => Self::Dgnss,
            3 => Self::FixedLocation,
            4 => Self::RtkFixed,
            5 => Self::RtkFloat,
            6 => Self::Sbas,
            7 => Self::MovingBaseRtkFixed,
            8 => Self::MovingBaseRtkFloat,
            10 => Self::Ppp,
            other => Self::Unknown(other),
        }
    }

    pub const fn is_fix(self) -> bool {
        !matches!(self, Self::NoPvt | Self::Unknown(_))
    }
}

bitflags! {
    /// Flag bits of the PVT `Mode` byte
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PvtModeFlags: u8 {
        /// Base station is still determining its own position
        const AUTO_BASE = 0x40;
        /// Height is fixed, 2D solution
        const TWO_D = 0x80;
    }
}

impl PvtModeFlags {
    pub const fn from_mode(mode: u8) -> Self {
        Self::from_bits_truncate(mode)
    }
}

/// PVT `Error` byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PvtError {
    None,
    NotEnoughMeasurements,
    NotEnoughEphemerides,
    DopTooLarge,
    ResidualsTooLarge,
    NoConvergence,
    NotEnoughMeasurementsAfterRejection,
    ExportLawsProhibit,
    NotEnoughCorrections,
    BaseCoordinatesUnavailable,
    AmbiguitiesNotFixed,
    Other(u8),
}

impl From<u8> for PvtError {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::NotEnoughMeasurements,
            2 => Self::NotEnoughEphemerides,
            3 => Self::DopTooLarge,
            4 => Self::ResidualsTooLarge,
            5 => Self::NoConvergence,
            6 => Self::NotEnoughMeasurementsAfterRejection,
            7 => Self::ExportLawsProhibit,
            8 => Self::NotEnoughCorrections,
            9 => Self::BaseCoordinatesUnavailable,
            10 => Self::AmbiguitiesNotFixed,
            other => Self::Other(other),
        }
    }
}

/// Attitude `Mode` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttitudeMode {
    NoAttitude,
    HeadingPitchFloat,
    HeadingPitchFixed,
    HeadingPitchRollFloat,
    HeadingPitchRollFixed,
    Unknown(u16),
}

impl From<u16> for AttitudeMode {
    fn from(mode: u16) -> Self {
        match mode {
            0 => Self::NoAttitude,
            1 => Self::HeadingPitchFloat,
            2 => Self::HeadingPitchFixed,
            3 => Self::HeadingPitchRollFloat,
            4 => Self::HeadingPitchRollFixed,
            other => Self::Unknown(other),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mode_byte_split() {
        let mode = 0x84; // 2D, RTK fixed
        assert_eq!(PvtSolution::from_mode(mode), PvtSolution::RtkFixed);
        assert_eq!(PvtModeFlags::from_mode(mode), PvtModeFlags::TWO_D);
        assert_eq!(PvtSolution::from_mode(0x09), PvtSolution::Unknown(9));
        assert!(!PvtSolution::from_mode(0).is_fix());
    }

    #[test]
    fn error_codes() {
        assert_eq!(PvtError::from(0), PvtError::None);
        assert_eq!(PvtError::from(3), PvtError::DopTooLarge);
        assert_eq!(PvtError::from(42), PvtError::Other(42));
        assert_eq!(AttitudeMode::from(4), AttitudeMode::HeadingPitchRollFixed);
    }
}

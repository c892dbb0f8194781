//! Records synthesized from several cached blocks.
//!
//! Values the receiver marks "do not use" come out as `NaN`.

use crate::blocks::{
    float_or_dnu, AttCovEuler, AttEuler, PosCovGeodetic, PvtError, PvtGeodetic, PvtSolution,
};

/// Fix status of a [`NavSatFix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavSatStatus {
    NoFix,
    Fix,
    /// Augmented by a satellite based system
    SbasFix,
    /// Augmented by ground based corrections (DGNSS, RTK)
    GbasFix,
}

impl From<PvtSolution> for NavSatStatus {
    fn from(solution: PvtSolution) -> Self {
        match solution {
            PvtSolution::NoPvt | PvtSolution::Unknown(_) => Self::NoFix,
            PvtSolution::StandAlone | PvtSolution::FixedLocation | PvtSolution::Ppp => Self::Fix,
            PvtSolution::Sbas => Self::SbasFix,
            PvtSolution::Dgnss
            | PvtSolution::RtkFixed
            | PvtSolution::RtkFloat
            | PvtSolution::MovingBaseRtkFixed
            | PvtSolution::MovingBaseRtkFloat => Self::GbasFix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CovarianceType {
    Unknown,
    Approximated,
    DiagonalKnown,
    Known,
}

/// Position fix with covariance
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavSatFix {
    pub status: NavSatStatus,
    /// Latitude (deg)
    pub latitude: f64,
    /// Longitude (deg)
    pub longitude: f64,
    /// Ellipsoidal height (m)
    pub altitude: f64,
    /// East, north, up covariance (m²), row-major
    pub position_covariance: [f64; 9],
    pub position_covariance_type: CovarianceType,
}

impl NavSatFix {
    pub fn from_blocks(pvt: &PvtGeodetic, cov: &PosCovGeodetic) -> Self {
        let (position_covariance, position_covariance_type) = match cov.enu_covariance() {
            Some(matrix) => (matrix, CovarianceType::Known),
            None => ([0.0; 9], CovarianceType::Unknown),
        };
        Self {
            status: NavSatStatus::from(pvt.solution()),
            latitude: pvt.latitude_degrees().unwrap_or(f64::NAN),
            longitude: pvt.longitude_degrees().unwrap_or(f64::NAN),
            altitude: pvt.height_meters().unwrap_or(f64::NAN),
            position_covariance,
            position_covariance_type,
        }
    }
}

/// Full navigation state: position, motion, attitude and their uncertainties
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsFix {
    pub status: NavSatStatus,
    pub error: PvtError,
    pub satellites_used: u8,
    /// Latitude (deg)
    pub latitude: f64,
    /// Longitude (deg)
    pub longitude: f64,
    /// Ellipsoidal height (m)
    pub altitude: f64,
    /// Course over ground (deg)
    pub track: f64,
    /// Horizontal speed (m/s)
    pub speed: f64,
    /// Vertical speed (m/s)
    pub climb: f64,
    /// Attitude (deg)
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
    /// Standard deviations of latitude, longitude and height (m)
    pub position_std: [f64; 3],
    /// Standard deviations of heading, pitch and roll (deg)
    pub attitude_std: [f64; 3],
}

impl GpsFix {
    pub fn from_blocks(
        pvt: &PvtGeodetic,
        pos_cov: &PosCovGeodetic,
        att: &AttEuler,
        att_cov: &AttCovEuler,
    ) -> Self {
        let float = |value: Option<f32>| value.map_or(f64::NAN, f64::from);
        Self {
            status: NavSatStatus::from(pvt.solution()),
            error: pvt.error_code(),
            satellites_used: pvt.nr_sv,
            latitude: pvt.latitude_degrees().unwrap_or(f64::NAN),
            longitude: pvt.longitude_degrees().unwrap_or(f64::NAN),
            altitude: pvt.height_meters().unwrap_or(f64::NAN),
            track: float(pvt.course_degrees()),
            speed: float(pvt.horizontal_speed()),
            climb: float(float_or_dnu(pvt.vu)),
            heading: float(att.heading_degrees()),
            pitch: float(att.pitch_degrees()),
            roll: float(att.roll_degrees()),
            position_std: pos_cov.std_devs().unwrap_or([f64::NAN; 3]),
            attitude_std: att_cov.std_devs().unwrap_or([f64::NAN; 3]),
        }
    }
}

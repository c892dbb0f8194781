use core::{fmt, str::FromStr};

use crate::{
    blocks::{AttCovEuler, AttEuler, PosCovGeodetic, PvtCartesian, PvtGeodetic, SbfBlock},
    nmea::Gga,
    parser::MessageId,
    time::Timestamp,
    GpsFix, NavSatFix, UnknownRecordKind,
};

/// Every record type the decoder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordKind {
    PvtCartesian,
    PvtGeodetic,
    PosCovGeodetic,
    AttEuler,
    AttCovEuler,
    Gga,
    Response,
    /// Synthesized from cached geodetic position and its covariance
    NavSatFix,
    /// Synthesized from cached position, attitude and both covariances
    GpsFix,
}

impl RecordKind {
    pub const ALL: [RecordKind; 9] = [
        Self::PvtCartesian,
        Self::PvtGeodetic,
        Self::PosCovGeodetic,
        Self::AttEuler,
        Self::AttCovEuler,
        Self::Gga,
        Self::Response,
        Self::NavSatFix,
        Self::GpsFix,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Dispatch table from wire identity to record kind.
    ///
    /// Composite kinds have no wire identity and never come out of here.
    pub fn from_id(id: &MessageId) -> Option<Self> {
        match id {
            MessageId::Sbf(PvtCartesian::NUMBER) => Some(Self::PvtCartesian),
            MessageId::Sbf(PvtGeodetic::NUMBER) => Some(Self::PvtGeodetic),
            MessageId::Sbf(PosCovGeodetic::NUMBER) => Some(Self::PosCovGeodetic),
            MessageId::Sbf(AttEuler::NUMBER) => Some(Self::AttEuler),
            MessageId::Sbf(AttCovEuler::NUMBER) => Some(Self::AttCovEuler),
            MessageId::Sbf(_) => None,
            MessageId::Nmea(keyword) => match keyword.as_str() {
                "$GPGGA" | "$GNGGA" => Some(Self::Gga),
                _ => None,
            },
            MessageId::Response(_) => Some(Self::Response),
        }
    }

    pub const fn is_composite(self) -> bool {
        matches!(self, Self::NavSatFix | Self::GpsFix)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PvtCartesian => "PVTCartesian",
            Self::PvtGeodetic => "PVTGeodetic",
            Self::PosCovGeodetic => "PosCovGeodetic",
            Self::AttEuler => "AttEuler",
            Self::AttCovEuler => "AttCovEuler",
            Self::Gga => "GGA",
            Self::Response => "Response",
            Self::NavSatFix => "NavSatFix",
            Self::GpsFix => "GPSFix",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    /// Accepts the kind name in any case, e.g. `pvtgeodetic` or `GPSFix`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRecordKind(s.to_owned()))
    }
}

/// Metadata attached to every decoded record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// Per-kind sequence number, starting at 0
    pub seq: u32,
    pub stamp: Timestamp,
    /// Caller supplied correlation tag, e.g. a coordinate frame name
    pub frame_id: String,
}

/// A record together with its [`Header`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stamped<T> {
    pub header: Header,
    pub data: T,
}

/// Command reply line sent by the receiver, without its terminator
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Response {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Record {
    PvtCartesian(Stamped<PvtCartesian>),
    PvtGeodetic(Stamped<PvtGeodetic>),
    PosCovGeodetic(Stamped<PosCovGeodetic>),
    AttEuler(Stamped<AttEuler>),
    AttCovEuler(Stamped<AttCovEuler>),
    Gga(Stamped<Gga>),
    Response(Stamped<Response>),
    NavSatFix(Stamped<NavSatFix>),
    GpsFix(Stamped<GpsFix>),
}

impl Record {
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::PvtCartesian(_) => RecordKind::PvtCartesian,
            Self::PvtGeodetic(_) => RecordKind::PvtGeodetic,
            Self::PosCovGeodetic(_) => RecordKind::PosCovGeodetic,
            Self::AttEuler(_) => RecordKind::AttEuler,
            Self::AttCovEuler(_) => RecordKind::AttCovEuler,
            Self::Gga(_) => RecordKind::Gga,
            Self::Response(_) => RecordKind::Response,
            Self::NavSatFix(_) => RecordKind::NavSatFix,
            Self::GpsFix(_) => RecordKind::GpsFix,
        }
    }

    pub const fn header(&self) -> &Header {
        match self {
            Self::PvtCartesian(r) => &r.header,
            Self::PvtGeodetic(r) => &r.header,
            Self::PosCovGeodetic(r) => &r.header,
            Self::AttEuler(r) => &r.header,
            Self::AttCovEuler(r) => &r.header,
            Self::Gga(r) => &r.header,
            Self::Response(r) => &r.header,
            Self::NavSatFix(r) => &r.header,
            Self::GpsFix(r) => &r.header,
        }
    }

    pub const fn seq(&self) -> u32 {
        self.header().seq
    }

    pub const fn stamp(&self) -> Timestamp {
        self.header().stamp
    }
}

pub const SYNC_CHAR_1: u8 = 0x24; // '$', shared by every protocol on the stream
pub const SBF_SYNC_CHAR_2: u8 = 0x40; // '@'
pub const NMEA_SYNC_CHAR_2: u8 = 0x47; // 'G', standard talker
pub const NMEA_PROPRIETARY_SYNC_CHAR_2: u8 = 0x50; // 'P', proprietary sentence
pub const RESPONSE_SYNC_CHAR_2: u8 = 0x52; // 'R', reply to a command

pub const CARRIAGE_RETURN: u8 = 0x0d;
pub const LINE_FEED: u8 = 0x0a;
pub(crate) const LINE_TERMINATOR_LEN: usize = 2;

pub(crate) const SYNC_SIZE: usize = 2;

pub(crate) const SBF_CHECKSUM_OFFSET: usize = 2; // After the sync chars
pub(crate) const SBF_ID_OFFSET: usize = 4;
pub(crate) const SBF_LENGTH_OFFSET: usize = 6;
pub const SBF_HEADER_LEN: usize = 8;

/// Low 13 bits of the ID field carry the block number, the rest the revision.
pub const SBF_BLOCK_NUMBER_MASK: u16 = 0x1fff;
pub(crate) const SBF_REVISION_SHIFT: u16 = 13;
pub(crate) const SBF_LENGTH_ALIGN: usize = 4;

/// Blocks longer than this are treated as a corrupted length field.
pub const SBF_MAX_BLOCK_LEN: usize = 8192;

pub const NMEA_CHECKSUM_DELIMITER: u8 = b'*';
pub const NMEA_FIELD_DELIMITER: u8 = b',';

/// An ASCII line with no terminator after this many bytes cannot be framed.
pub const ASCII_MAX_LINE_LEN: usize = 1024;

pub(crate) const GPS_EPOCH_UNIX_SECONDS: i64 = 315_964_800; // 1980-01-06T00:00:00Z
pub(crate) const SECONDS_PER_WEEK: i64 = 604_800;
pub(crate) const MILLIS_PER_WEEK: u32 = 604_800_000;
pub const DEFAULT_LEAP_SECONDS: i64 = 18;

/// Septentrio "do not use" marker for floating point fields.
pub(crate) const FLOAT_DO_NOT_USE: f64 = -2e10;

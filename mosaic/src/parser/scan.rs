//! Framing: sync scanning, message classification and length resolution.
//!
//! Everything here is a pure function of the bytes it is handed, so calling
//! [`locate`] twice on the same window gives the same answer.

use core::fmt;

use crate::{
    constants::{
        ASCII_MAX_LINE_LEN, CARRIAGE_RETURN, LINE_FEED, LINE_TERMINATOR_LEN, NMEA_FIELD_DELIMITER,
        NMEA_PROPRIETARY_SYNC_CHAR_2, NMEA_SYNC_CHAR_2, RESPONSE_SYNC_CHAR_2, SBF_BLOCK_NUMBER_MASK,
        SBF_HEADER_LEN, SBF_ID_OFFSET, SBF_LENGTH_ALIGN, SBF_LENGTH_OFFSET, SBF_MAX_BLOCK_LEN,
        SBF_SYNC_CHAR_2, SYNC_CHAR_1, SYNC_SIZE,
    },
    parser::ByteWindow,
    ParserError,
};

/// Which of the interleaved protocols a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Protocol {
    /// Binary SBF block, sync `$@`
    Sbf,
    /// NMEA sentence, sync `$G` or `$P`
    Nmea,
    /// Command reply line, sync `$R`
    Response,
}

impl Protocol {
    fn from_sync_char(second: u8) -> Option<Self> {
        match second {
            SBF_SYNC_CHAR_2 => Some(Self::Sbf),
            NMEA_SYNC_CHAR_2 | NMEA_PROPRIETARY_SYNC_CHAR_2 => Some(Self::Nmea),
            RESPONSE_SYNC_CHAR_2 => Some(Self::Response),
            _ => None,
        }
    }

    pub const fn is_ascii(self) -> bool {
        !matches!(self, Self::Sbf)
    }
}

/// Identity of a framed message.
///
/// SBF blocks are keyed by block number with the revision bits masked off,
/// ASCII lines by their leading keyword, e.g. `$GPGGA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageId {
    Sbf(u16),
    Nmea(String),
    Response(String),
}

impl MessageId {
    pub const fn protocol(&self) -> Protocol {
        match self {
            Self::Sbf(_) => Protocol::Sbf,
            Self::Nmea(_) => Protocol::Nmea,
            Self::Response(_) => Protocol::Response,
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sbf(number) => write!(f, "SBF {number}"),
            Self::Nmea(keyword) | Self::Response(keyword) => f.write_str(keyword),
        }
    }
}

/// Finds the first recognised sync pattern, returning its offset.
///
/// A lone `$` at the very end is not reported; more data may turn it into a sync.
pub fn find_sync(bytes: &[u8]) -> Option<(usize, Protocol)> {
    bytes
        .windows(SYNC_SIZE)
        .enumerate()
        .find_map(|(offset, pair)| {
            if pair[0] != SYNC_CHAR_1 {
                return None;
            }
            Protocol::from_sync_char(pair[1]).map(|protocol| (offset, protocol))
        })
}

/// Reads the identity of the message starting at `bytes[0]`.
///
/// Returns `None` when not enough bytes are present to tell.
pub fn classify(bytes: &[u8], protocol: Protocol) -> Option<MessageId> {
    match protocol {
        Protocol::Sbf => {
            let raw = bytes.get(SBF_ID_OFFSET..SBF_ID_OFFSET + 2)?;
            let id = u16::from_le_bytes([raw[0], raw[1]]);
            Some(MessageId::Sbf(id & SBF_BLOCK_NUMBER_MASK))
        },
        Protocol::Nmea | Protocol::Response => {
            let end = bytes
                .iter()
                .position(|&b| b == NMEA_FIELD_DELIMITER || b == CARRIAGE_RETURN)?;
            let keyword = String::from_utf8_lossy(&bytes[..end]).into_owned();
            Some(match protocol {
                Protocol::Nmea => MessageId::Nmea(keyword),
                _ => MessageId::Response(keyword),
            })
        },
    }
}

/// Result of resolving the total length of one message
#[derive(Debug, Clone, PartialEq)]
pub enum FrameLen {
    /// The message is `len` bytes long and all of them are present
    Complete(usize),
    /// Not all bytes are present yet; `required` is the total length when known
    Incomplete { required: Option<usize> },
    /// The message can never be framed
    Invalid(ParserError),
}

/// Resolves the length of the message starting at `bytes[0]`.
pub fn frame_len(bytes: &[u8], protocol: Protocol) -> FrameLen {
    match protocol {
        Protocol::Sbf => sbf_frame_len(bytes),
        Protocol::Nmea | Protocol::Response => ascii_frame_len(bytes),
    }
}

fn sbf_frame_len(bytes: &[u8]) -> FrameLen {
    if bytes.len() < SBF_HEADER_LEN {
        return FrameLen::Incomplete {
            required: Some(SBF_HEADER_LEN),
        };
    }
    let len = u16::from_le_bytes([bytes[SBF_LENGTH_OFFSET], bytes[SBF_LENGTH_OFFSET + 1]]);
    let total = usize::from(len);
    if total < SBF_HEADER_LEN || total % SBF_LENGTH_ALIGN != 0 || total > SBF_MAX_BLOCK_LEN {
        return FrameLen::Invalid(ParserError::InvalidBlockLength { len });
    }
    if bytes.len() < total {
        FrameLen::Incomplete {
            required: Some(total),
        }
    } else {
        FrameLen::Complete(total)
    }
}

fn ascii_frame_len(bytes: &[u8]) -> FrameLen {
    let searched = &bytes[..bytes.len().min(ASCII_MAX_LINE_LEN)];
    if let Some(pos) = searched
        .windows(LINE_TERMINATOR_LEN)
        .position(|pair| pair == [CARRIAGE_RETURN, LINE_FEED])
    {
        return FrameLen::Complete(pos + LINE_TERMINATOR_LEN);
    }
    if bytes.len() >= ASCII_MAX_LINE_LEN {
        FrameLen::Invalid(ParserError::LineTooLong {
            len: ASCII_MAX_LINE_LEN,
        })
    } else {
        FrameLen::Incomplete { required: None }
    }
}

/// A complete, not yet validated message inside a window
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    /// Offset of the sync bytes from the window start
    pub offset: usize,
    pub protocol: Protocol,
    pub id: MessageId,
    /// The whole message, sync and terminator included
    pub bytes: &'a [u8],
}

impl Frame<'_> {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset just past the message, where scanning resumes.
    pub fn end(&self) -> usize {
        self.offset + self.len()
    }
}

/// What the scanner found in a window
#[derive(Debug, Clone, PartialEq)]
pub enum Located<'a> {
    Frame(Frame<'a>),
    /// A message starts at `offset` but is not complete yet
    Incomplete {
        offset: usize,
        required: Option<usize>,
    },
    /// A message starts at `offset` but its length can never be resolved
    Unframeable { offset: usize, error: ParserError },
    /// No sync pattern; everything before `resume` is garbage
    NotFound { resume: usize },
}

/// Scans, classifies and sizes the next message in `window` without consuming it.
pub fn locate<'a>(window: &ByteWindow<'a>) -> Located<'a> {
    let bytes = window.as_slice();
    let Some((offset, protocol)) = find_sync(bytes) else {
        let resume = match bytes.last() {
            Some(&SYNC_CHAR_1) => bytes.len() - 1,
            _ => bytes.len(),
        };
        return Located::NotFound { resume };
    };
    let candidate = &bytes[offset..];
    let len = match frame_len(candidate, protocol) {
        FrameLen::Complete(len) => len,
        FrameLen::Incomplete { required } => return Located::Incomplete { offset, required },
        FrameLen::Invalid(error) => return Located::Unframeable { offset, error },
    };
    let bytes = &candidate[..len];
    match classify(bytes, protocol) {
        Some(id) => Located::Frame(Frame {
            offset,
            protocol,
            id,
            bytes,
        }),
        // A complete line always holds its CR, so classification cannot fall short
        None => Located::Incomplete {
            offset,
            required: None,
        },
    }
}

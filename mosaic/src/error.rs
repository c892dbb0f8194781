use thiserror::Error;

/// Errors that can happen while framing, validating or decoding one message
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParserError {
    #[error("Not valid block checksum, expect {expect:#06x}, got {got:#06x}")]
    InvalidChecksum { expect: u16, got: u16 },

    #[error("Invalid block({packet}) length, expect at least {expect}, got {got}")]
    InvalidPacketLen {
        packet: &'static str,
        expect: usize,
        got: usize,
    },

    /// The header length is shorter than the header, not 4-aligned, or implausibly large
    #[error("Unframeable block length {len}")]
    InvalidBlockLength { len: u16 },

    #[error("ASCII line exceeds {len} bytes without a terminator")]
    LineTooLong { len: usize },

    #[error("Message of {required_size} bytes does not fit into the parser buffer")]
    OutOfMemory { required_size: usize },

    #[error("Sentence rejected: {0}")]
    Sentence(#[from] SentenceError),
}

/// Errors reported by a [`crate::SentenceParser`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SentenceError {
    #[error("Sentence contains non ASCII bytes")]
    NotAscii,

    #[error("Not valid sentence checksum, expect {expect:#04x}, got {got:#04x}")]
    InvalidChecksum { expect: u8, got: u8 },

    #[error("Malformed checksum suffix {0:?}")]
    MalformedChecksum(String),

    #[error("Sentence {keyword} is missing field {field}")]
    MissingField {
        keyword: String,
        field: &'static str,
    },

    #[error("Invalid field {field} in sentence {keyword}: {value:?}")]
    InvalidField {
        keyword: String,
        field: &'static str,
        value: String,
    },

    #[error("Parser cannot handle sentence {0}")]
    UnexpectedKeyword(String),
}

/// A record kind name that does not match any [`crate::RecordKind`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown record kind {0:?}")]
pub struct UnknownRecordKind(pub String);

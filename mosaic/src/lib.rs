//! # mosaic
//!
//! Pure-rust framing and decoding of the byte stream produced by Septentrio
//! mosaic GNSS receivers. One serial or TCP stream interleaves three formats:
//! binary SBF blocks (`$@`), NMEA sentences (`$G`, `$P`) and command replies
//! (`$R`). This crate finds the messages in arbitrary chunks of that stream,
//! checks them, and turns them into typed, timestamped records.
//!
//! Decoding a window
//! =================
//!
//! The core is a [`Decoder`] working on a [`ByteWindow`]. Every call consumes
//! at most one message and reports an explicit [`Outcome`]:
//! ```
//! use mosaic::{ByteWindow, Decoder, Outcome, Request};
//!
//! let mut decoder = Decoder::default();
//! let data = b"$R: setPVTInterval, sec1\r\n"; // From your serial port
//! let mut window = ByteWindow::new(data);
//! loop {
//!     match decoder.decode(&mut window, Request::Any) {
//!         Ok(Outcome::Decoded(record)) => {
//!             // A typed record with sequence number and timestamp
//!             assert_eq!(record.seq(), 0);
//!         }
//!         Ok(Outcome::NeedMoreData { .. }) => {
//!             // Keep `window.as_slice()` and retry once more bytes arrived
//!             break;
//!         }
//!         Ok(_) => {
//!             // Bad checksum, unknown message or missing composite inputs
//!         }
//!         Err(_) => {
//!             // Unframeable input, the window already skipped it
//!         }
//!     }
//! }
//! ```
//!
//! Streaming
//! =========
//!
//! [`Parser`] keeps the bytes of incomplete messages between reads and hands out
//! an iterator over the records completed by each new chunk:
//! ```
//! use mosaic::Parser;
//!
//! let mut parser = Parser::default();
//! let my_raw_data = vec![1, 2, 3, 4]; // From your serial port
//! for record in parser.consume(&my_raw_data) {
//!     match record {
//!         Ok(_record) => {}
//!         Err(_err) => {}
//!     }
//! }
//! ```
//! To bound memory use, construct the parser over a [`FixedLinearBuffer`]:
//! ```
//! use mosaic::{Decoder, FixedLinearBuffer, Parser};
//!
//! let mut storage = [0; 1024];
//! let buf = FixedLinearBuffer::new(&mut storage);
//! let mut parser = Parser::new(buf, Decoder::default());
//! assert!(parser.consume(&[1, 2, 3]).next().is_none());
//! ```
//!
//! Composite records
//! =================
//!
//! [`NavSatFix`] and [`GpsFix`] are not sent by the receiver. Request them with
//! [`Request::Kind`] once the blocks they are built from have been decoded;
//! before that the decoder answers [`Outcome::DependencyUnavailable`].

mod blocks;
mod composite;
mod constants;
mod decoder;
mod error;
mod nmea;
mod parser;
mod record;
mod time;

pub use crate::{
    blocks::{
        float_or_dnu, unsigned_or_dnu, AttCovEuler, AttEuler, AttitudeMode, LeField,
        PosCovGeodetic, PvtCartesian, PvtError, PvtGeodetic, PvtModeFlags, PvtSolution, SbfBlock,
    },
    composite::{CovarianceType, GpsFix, NavSatFix, NavSatStatus},
    constants::*,
    decoder::{
        Decoder, DecoderBuilder, DecoderConfig, DerivedCache, Outcome, Request, SequenceCounters,
    },
    error::{ParserError, SentenceError, UnknownRecordKind},
    nmea::{Gga, GgaParser, NmeaSentence, SentenceParser},
    parser::{
        classify, find_sync, frame_len, locate, sbf_checksum, ByteWindow, FixedLinearBuffer, Frame,
        FrameLen, Located, MessageId, Parser, ParserIter, Protocol, UnderlyingBuffer,
    },
    record::{Header, Record, RecordKind, Response, Stamped},
    time::{TimeSource, Timestamp},
};

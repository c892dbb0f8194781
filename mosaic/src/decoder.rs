use chrono::Utc;
use log::{debug, trace, warn};

use crate::{
    blocks::{
        unsigned_or_dnu, AttCovEuler, AttEuler, PosCovGeodetic, PvtCartesian, PvtGeodetic,
        SbfBlock,
    },
    constants::{CARRIAGE_RETURN, DEFAULT_LEAP_SECONDS, LINE_FEED, SYNC_SIZE},
    nmea::{Gga, GgaParser, NmeaSentence, SentenceParser},
    parser::{locate, ByteWindow, Frame, Located, MessageId, Protocol, SbfChecksumCalc},
    record::{Header, Record, RecordKind, Response, Stamped},
    time::{TimeSource, Timestamp},
    GpsFix, NavSatFix, ParserError,
};

/// Per-session decoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Copied into every record header
    pub frame_id: String,
    pub time_source: TimeSource,
    /// GPS minus UTC, in seconds
    pub leap_seconds: i64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            frame_id: "gnss".to_owned(),
            time_source: TimeSource::Device,
            leap_seconds: DEFAULT_LEAP_SECONDS,
        }
    }
}

/// What a decode call should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Whatever message comes next
    Any,
    /// Only this kind. Composite kinds are synthesized from the cache without
    /// touching the window.
    Kind(RecordKind),
}

/// Result of one decode call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Decoded(Record),
    /// The window holds no complete message. Bytes before a partial message
    /// are consumed, the partial message itself is not.
    NeedMoreData { required: Option<usize> },
    /// The message was consumed but failed its checksum or could not be parsed
    ValidationFailed(ParserError),
    /// The message was consumed but has no decode routine or was not requested
    NotHandled(MessageId),
    /// A composite was requested before all of its inputs were decoded
    DependencyUnavailable(RecordKind),
}

/// Last decoded block of every kind that feeds a composite record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedCache {
    pvt_geodetic: Option<PvtGeodetic>,
    pos_cov_geodetic: Option<PosCovGeodetic>,
    att_euler: Option<AttEuler>,
    att_cov_euler: Option<AttCovEuler>,
}

impl DerivedCache {
    pub fn pvt_geodetic(&self) -> Option<&PvtGeodetic> {
        self.pvt_geodetic.as_ref()
    }

    pub fn pos_cov_geodetic(&self) -> Option<&PosCovGeodetic> {
        self.pos_cov_geodetic.as_ref()
    }

    pub fn att_euler(&self) -> Option<&AttEuler> {
        self.att_euler.as_ref()
    }

    pub fn att_cov_euler(&self) -> Option<&AttCovEuler> {
        self.att_cov_euler.as_ref()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Next sequence number of every record kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceCounters {
    next: [u32; RecordKind::ALL.len()],
}

impl SequenceCounters {
    /// Number of records of `kind` decoded so far.
    pub fn get(&self, kind: RecordKind) -> u32 {
        self.next[kind.index()]
    }

    fn take(&mut self, kind: RecordKind) -> u32 {
        let counter = &mut self.next[kind.index()];
        let seq = *counter;
        *counter = counter.wrapping_add(1);
        seq
    }
}

/// Stateful decode dispatcher.
///
/// One instance per receiver stream: it owns the cache composite records are
/// built from and the per-kind sequence counters. ASCII sentences are handed
/// to `P`.
#[derive(Debug, Clone)]
pub struct Decoder<P = GgaParser> {
    config: DecoderConfig,
    sentence_parser: P,
    cache: DerivedCache,
    counters: SequenceCounters,
}

impl Default for Decoder<GgaParser> {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl Decoder<GgaParser> {
    pub fn new(config: DecoderConfig) -> Self {
        Self::with_sentence_parser(config, GgaParser)
    }

    pub fn builder() -> DecoderBuilder<GgaParser> {
        DecoderBuilder::default()
    }
}

impl<P> Decoder<P>
where
    P: SentenceParser<Output = Gga>,
{
    pub fn with_sentence_parser(config: DecoderConfig, sentence_parser: P) -> Self {
        Self {
            config,
            sentence_parser,
            cache: DerivedCache::default(),
            counters: SequenceCounters::default(),
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn cache(&self) -> &DerivedCache {
        &self.cache
    }

    pub fn counters(&self) -> &SequenceCounters {
        &self.counters
    }

    /// Forgets cached blocks and restarts every sequence at 0, e.g. after
    /// switching to another receiver.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.counters = SequenceCounters::default();
    }

    /// Decodes the next message in `window`, advancing it past whatever was
    /// consumed.
    ///
    /// `Err` is returned only for input that can never be framed: an
    /// impossible SBF length or an over-long ASCII line. The window is then
    /// moved past the offending sync bytes so the next call resynchronises.
    pub fn decode(
        &mut self,
        window: &mut ByteWindow<'_>,
        request: Request,
    ) -> Result<Outcome, ParserError> {
        if let Request::Kind(kind) = request {
            if let Some(outcome) = self.synthesize(kind) {
                return Ok(outcome);
            }
        }

        let frame = match locate(window) {
            Located::Frame(frame) => frame,
            Located::Incomplete { offset, required } => {
                window.advance(offset);
                return Ok(Outcome::NeedMoreData { required });
            },
            Located::NotFound { resume } => {
                window.advance(resume);
                return Ok(Outcome::NeedMoreData { required: None });
            },
            Located::Unframeable { offset, error } => {
                warn!("Dropping unframeable message at offset {offset}: {error}");
                window.advance(offset + SYNC_SIZE);
                return Err(error);
            },
        };
        window.advance(frame.end());
        trace!("{} at offset {}, {} bytes", frame.id, frame.offset, frame.len());

        if frame.protocol == Protocol::Sbf {
            if let Err(err) = SbfChecksumCalc::validate_block(frame.bytes) {
                warn!("{}: {err}", frame.id);
                return Ok(Outcome::ValidationFailed(err));
            }
        }

        let Some(kind) = RecordKind::from_id(&frame.id) else {
            debug!("No decode routine for {}", frame.id);
            return Ok(Outcome::NotHandled(frame.id));
        };
        if let Request::Kind(wanted) = request {
            if wanted != kind {
                return Ok(Outcome::NotHandled(frame.id));
            }
        }
        Ok(self.dispatch(kind, &frame))
    }

    fn dispatch(&mut self, kind: RecordKind, frame: &Frame<'_>) -> Outcome {
        let decoded = match kind {
            RecordKind::PvtCartesian => self
                .decode_block::<PvtCartesian>(kind, frame)
                .map(Record::PvtCartesian),
            RecordKind::PvtGeodetic => self
                .decode_block::<PvtGeodetic>(kind, frame)
                .map(|record| {
                    self.cache.pvt_geodetic = Some(record.data.clone());
                    Record::PvtGeodetic(record)
                }),
            RecordKind::PosCovGeodetic => self
                .decode_block::<PosCovGeodetic>(kind, frame)
                .map(|record| {
                    self.cache.pos_cov_geodetic = Some(record.data.clone());
                    Record::PosCovGeodetic(record)
                }),
            RecordKind::AttEuler => self
                .decode_block::<AttEuler>(kind, frame)
                .map(|record| {
                    self.cache.att_euler = Some(record.data.clone());
                    Record::AttEuler(record)
                }),
            RecordKind::AttCovEuler => self
                .decode_block::<AttCovEuler>(kind, frame)
                .map(|record| {
                    self.cache.att_cov_euler = Some(record.data.clone());
                    Record::AttCovEuler(record)
                }),
            RecordKind::Gga => self.decode_sentence(frame),
            RecordKind::Response => Ok(self.decode_response(frame)),
            // never on the wire
            RecordKind::NavSatFix | RecordKind::GpsFix => {
                return Outcome::NotHandled(frame.id.clone());
            },
        };
        match decoded {
            Ok(record) => Outcome::Decoded(record),
            Err(err) => {
                warn!("{}: {err}", frame.id);
                Outcome::ValidationFailed(err)
            },
        }
    }

    fn decode_block<B: SbfBlock>(
        &mut self,
        kind: RecordKind,
        frame: &Frame<'_>,
    ) -> Result<Stamped<B>, ParserError> {
        let block = B::parse(frame.bytes)?;
        let stamp = self.stamp_tow(block.tow());
        Ok(self.stamped(kind, stamp, block))
    }

    fn decode_sentence(&mut self, frame: &Frame<'_>) -> Result<Record, ParserError> {
        let sentence = NmeaSentence::tokenize(frame.bytes)?;
        let gga = self.sentence_parser.parse(&sentence)?;
        let stamp = match (self.config.time_source, gga.utc_seconds) {
            (TimeSource::Device, Some(seconds)) => {
                Timestamp::from_utc_time_of_day(seconds, &Utc::now()).unwrap_or_else(Timestamp::now)
            },
            _ => Timestamp::now(),
        };
        Ok(Record::Gga(self.stamped(RecordKind::Gga, stamp, gga)))
    }

    fn decode_response(&mut self, frame: &Frame<'_>) -> Record {
        let line = frame
            .bytes
            .strip_suffix(&[CARRIAGE_RETURN, LINE_FEED])
            .unwrap_or(frame.bytes);
        let response = Response {
            text: String::from_utf8_lossy(line).into_owned(),
        };
        Record::Response(self.stamped(RecordKind::Response, Timestamp::now(), response))
    }

    /// Builds a composite record from the cache. `None` for non-composite kinds.
    fn synthesize(&mut self, kind: RecordKind) -> Option<Outcome> {
        let record = match kind {
            RecordKind::NavSatFix => {
                let (Some(pvt), Some(cov)) = (&self.cache.pvt_geodetic, &self.cache.pos_cov_geodetic)
                else {
                    return Some(dependency_unavailable(kind));
                };
                let data = NavSatFix::from_blocks(pvt, cov);
                let stamp = self.stamp_tow(pvt.tow);
                Record::NavSatFix(self.stamped(kind, stamp, data))
            },
            RecordKind::GpsFix => {
                let cache = &self.cache;
                let (Some(pvt), Some(pos_cov), Some(att), Some(att_cov)) = (
                    &cache.pvt_geodetic,
                    &cache.pos_cov_geodetic,
                    &cache.att_euler,
                    &cache.att_cov_euler,
                ) else {
                    return Some(dependency_unavailable(kind));
                };
                let data = GpsFix::from_blocks(pvt, pos_cov, att, att_cov);
                let stamp = self.stamp_tow(pvt.tow);
                Record::GpsFix(self.stamped(kind, stamp, data))
            },
            _ => return None,
        };
        Some(Outcome::Decoded(record))
    }

    fn stamp_tow(&self, tow: u32) -> Timestamp {
        match (self.config.time_source, unsigned_or_dnu(tow)) {
            (TimeSource::Device, Some(tow)) => Timestamp::from_tow(tow, self.config.leap_seconds),
            _ => Timestamp::now(),
        }
    }

    fn stamped<T>(&mut self, kind: RecordKind, stamp: Timestamp, data: T) -> Stamped<T> {
        Stamped {
            header: Header {
                seq: self.counters.take(kind),
                stamp,
                frame_id: self.config.frame_id.clone(),
            },
            data,
        }
    }
}

fn dependency_unavailable(kind: RecordKind) -> Outcome {
    debug!("{kind} requested before its inputs were decoded");
    Outcome::DependencyUnavailable(kind)
}

/// Builder for [`Decoder`]
#[derive(Debug, Clone, Default)]
pub struct DecoderBuilder<P = GgaParser> {
    config: DecoderConfig,
    sentence_parser: P,
}

impl<P> DecoderBuilder<P> {
    pub fn with_frame_id(mut self, frame_id: impl Into<String>) -> Self {
        self.config.frame_id = frame_id.into();
        self
    }

    pub fn with_time_source(mut self, time_source: TimeSource) -> Self {
        self.config.time_source = time_source;
        self
    }

    pub fn with_leap_seconds(mut self, leap_seconds: i64) -> Self {
        self.config.leap_seconds = leap_seconds;
        self
    }

    /// Replaces the parser ASCII sentences are handed to.
    pub fn with_sentence_parser<Q>(self, sentence_parser: Q) -> DecoderBuilder<Q>
    where
        Q: SentenceParser<Output = Gga>,
    {
        DecoderBuilder {
            config: self.config,
            sentence_parser,
        }
    }

    pub fn build(self) -> Decoder<P>
    where
        P: SentenceParser<Output = Gga>,
    {
        Decoder::with_sentence_parser(self.config, self.sentence_parser)
    }
}

mod buffer;
mod checksum;
mod scan;
mod window;

pub use buffer::{FixedLinearBuffer, UnderlyingBuffer};
pub(crate) use checksum::SbfChecksumCalc;
pub use checksum::sbf_checksum;
pub use scan::{classify, find_sync, frame_len, locate, Frame, FrameLen, Located, MessageId, Protocol};
pub use window::ByteWindow;

use crate::{
    constants::SYNC_SIZE,
    decoder::{Decoder, Outcome, Request},
    nmea::{Gga, GgaParser, SentenceParser},
    record::Record,
    ParserError,
};

/// Streaming parser keeping the bytes of incomplete messages between reads.
///
/// The default constructor uses a `Vec`; pass a [`FixedLinearBuffer`] to
/// [`Parser::new`] to bound memory use.
pub struct Parser<T = Vec<u8>, P = GgaParser>
where
    T: UnderlyingBuffer,
{
    buf: T,
    decoder: Decoder<P>,
}

impl Default for Parser<Vec<u8>, GgaParser> {
    fn default() -> Self {
        Self::new(Vec::new(), Decoder::default())
    }
}

impl<T, P> Parser<T, P>
where
    T: UnderlyingBuffer,
    P: SentenceParser<Output = Gga>,
{
    pub fn new(underlying: T, decoder: Decoder<P>) -> Self {
        Self {
            buf: underlying,
            decoder,
        }
    }

    pub fn is_buffer_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn buffer_len(&self) -> usize {
        self.buf.len()
    }

    pub fn decoder(&self) -> &Decoder<P> {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut Decoder<P> {
        &mut self.decoder
    }

    /// Appends `new_data` and iterates over the records now complete.
    ///
    /// Bytes of a trailing partial message are kept for the next call when
    /// the iterator is dropped.
    pub fn consume<'a>(&'a mut self, new_data: &'a [u8]) -> ParserIter<'a, T, P> {
        ParserIter {
            buf: &mut self.buf,
            decoder: &mut self.decoder,
            pending: new_data,
            consumed: 0,
        }
    }
}

/// Iterator over the records found by [`Parser::consume`]
///
/// Messages without a decode routine are skipped. Checksum and parse
/// failures come out as `Err` and iteration continues after them.
pub struct ParserIter<'a, T, P = GgaParser>
where
    T: UnderlyingBuffer,
{
    buf: &'a mut T,
    decoder: &'a mut Decoder<P>,
    /// New data not yet copied into `buf`
    pending: &'a [u8],
    /// Bytes at the front of `buf` already decoded
    consumed: usize,
}

impl<T: UnderlyingBuffer, P> ParserIter<'_, T, P> {
    /// Drops decoded bytes and moves as much pending data into the buffer as fits.
    fn refill(&mut self) {
        if self.consumed > 0 {
            self.buf.drain(self.consumed);
            self.consumed = 0;
        }
        if !self.pending.is_empty() {
            let left_out = self.buf.extend_from_slice(self.pending);
            self.pending = &self.pending[self.pending.len() - left_out..];
        }
    }
}

impl<T, P> Iterator for ParserIter<'_, T, P>
where
    T: UnderlyingBuffer,
    P: SentenceParser<Output = Gga>,
{
    type Item = Result<Record, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.pending.is_empty() {
                self.refill();
            }
            let mut window = ByteWindow::new(&self.buf.as_slice()[self.consumed..]);
            let result = self.decoder.decode(&mut window, Request::Any);
            let progress = window.position();
            self.consumed += progress;

            match result {
                Ok(Outcome::Decoded(record)) => return Some(Ok(record)),
                Ok(Outcome::ValidationFailed(err)) | Err(err) => return Some(Err(err)),
                Ok(Outcome::NotHandled(_)) | Ok(Outcome::DependencyUnavailable(_)) => {},
                Ok(Outcome::NeedMoreData { required }) => {
                    if self.pending.is_empty() {
                        return None;
                    }
                    // A message that starts at the buffer front and still does not fit
                    if progress == 0 && self.consumed == 0 && self.buf.is_full() {
                        let required_size =
                            required.unwrap_or_else(|| self.buf.len() + self.pending.len());
                        self.consumed = SYNC_SIZE.min(self.buf.len());
                        return Some(Err(ParserError::OutOfMemory { required_size }));
                    }
                },
            }
        }
    }
}

impl<T: UnderlyingBuffer, P> Drop for ParserIter<'_, T, P> {
    fn drop(&mut self) {
        self.refill();
    }
}

/// Read-only view over a chunk of receiver bytes.
///
/// The caller owns the bytes; decoding only ever moves the start of the
/// window forward, so `remaining()` never grows during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteWindow<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left between the current start and the end of the window.
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Number of bytes consumed since the window was created.
    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn as_slice(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Moves the start forward, stopping at the end of the window.
    pub fn advance(&mut self, count: usize) {
        self.pos = core::cmp::min(self.pos + count, self.data.len());
    }
}

/// Storage the streaming [`crate::Parser`] accumulates receiver bytes in.
///
/// Implemented for `Vec<u8>` (grows without bound) and for
/// [`FixedLinearBuffer`] (borrowed storage of a fixed size). Implement it for
/// your own type if neither fits; the `flb_*` unit tests show what the parser
/// relies on.
pub trait UnderlyingBuffer {
    /// Removes all bytes from the buffer.
    fn clear(&mut self);

    /// Number of bytes currently stored.
    fn len(&self) -> usize;

    /// Upper bound of bytes the buffer can hold at once.
    ///
    /// `extend_from_slice` must accept `max_capacity() - len()` bytes without
    /// leaving any behind. `Vec` reports `usize::MAX` and relies on the
    /// allocator to fail first.
    fn max_capacity(&self) -> usize;

    /// Appends as much of `other` as fits, returning how many bytes were left out.
    fn extend_from_slice(&mut self, other: &[u8]) -> usize;

    /// Removes the first `count` bytes, or everything if fewer are stored.
    fn drain(&mut self, count: usize);

    /// The stored bytes, oldest first.
    fn as_slice(&self) -> &[u8];

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool {
        self.len() >= self.max_capacity()
    }
}

impl UnderlyingBuffer for Vec<u8> {
    fn clear(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn max_capacity(&self) -> usize {
        usize::MAX
    }

    fn extend_from_slice(&mut self, other: &[u8]) -> usize {
        self.extend_from_slice(other);
        0
    }

    fn drain(&mut self, count: usize) {
        let count = count.min(self.len());
        self.drain(..count);
    }

    fn as_slice(&self) -> &[u8] {
        self
    }
}

/// Fixed-size buffer over caller provided storage, for when the input rate is
/// bounded and allocation is not wanted.
pub struct FixedLinearBuffer<'a> {
    storage: &'a mut [u8],
    len: usize,
}

impl<'a> FixedLinearBuffer<'a> {
    pub fn new(storage: &'a mut [u8]) -> Self {
        Self { storage, len: 0 }
    }
}

impl UnderlyingBuffer for FixedLinearBuffer<'_> {
    fn clear(&mut self) {
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn max_capacity(&self) -> usize {
        self.storage.len()
    }

    fn extend_from_slice(&mut self, other: &[u8]) -> usize {
        let to_copy = core::cmp::min(other.len(), self.storage.len() - self.len);
        self.storage[self.len..self.len + to_copy].copy_from_slice(&other[..to_copy]);
        self.len += to_copy;
        other.len() - to_copy
    }

    fn drain(&mut self, count: usize) {
        if count >= self.len {
            self.len = 0;
            return;
        }
        self.storage.copy_within(count..self.len, 0);
        self.len -= count;
    }

    fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }
}

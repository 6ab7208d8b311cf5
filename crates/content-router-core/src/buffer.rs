//! Reusable byte buffers for payload transport.
//!
//! A [`Buffer`] is a growable byte container that the router threads through
//! a dispatch: the caller writes the payload into it, matchers read it, and
//! handlers may rewrite it in place. Buffers are designed for reuse through
//! a [`Pool`](crate::pool::Pool) — [`reset`](Buffer::reset) empties the
//! contents while keeping the allocation, so a warmed-up pool serves the
//! steady-state path without touching the allocator.
//!
//! # Slices and Clones
//!
//! [`slice`](Buffer::slice) detaches a copy of a byte range into a new
//! buffer; subsequent writes to the source are never visible through the
//! slice. [`Clone`] likewise yields a fully independent copy. Zero-copy
//! sharing of whole buffers happens one layer up, where the framework's
//! context hands the same buffer to forked contexts.

use std::io;

/// Initial capacity of a freshly constructed buffer, in bytes.
///
/// Sized to absorb typical payloads without an early reallocation burst.
pub const INITIAL_CAPACITY: usize = 1024;

/// A growable, reusable byte container.
///
/// `Buffer` wraps a `Vec<u8>` with the contract the dispatch engine needs:
/// appends grow amortized O(1), [`reset`](Self::reset) keeps the capacity,
/// and [`truncate`](Self::truncate) never grows or panics.
///
/// # Example
///
/// ```
/// use content_router_core::Buffer;
///
/// let mut buf = Buffer::new();
/// buf.write_str("EVENT:login");
/// assert_eq!(buf.bytes(), b"EVENT:login");
///
/// buf.truncate(5);
/// assert_eq!(buf.bytes(), b"EVENT");
///
/// buf.reset();
/// assert!(buf.is_empty());
/// assert!(buf.capacity() >= 1024);
/// ```
#[derive(Clone, Default)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Creates an empty buffer with the default initial capacity.
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Creates an empty buffer with at least the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Returns the valid contents as a byte slice.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of valid bytes in the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current allocated capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Appends the given bytes, growing the buffer as needed.
    ///
    /// Returns the number of bytes written, which is always `p.len()`.
    pub fn write(&mut self, p: &[u8]) -> usize {
        self.data.extend_from_slice(p);
        p.len()
    }

    /// Appends the UTF-8 bytes of `s`, growing the buffer as needed.
    ///
    /// Returns the number of bytes written.
    pub fn write_str(&mut self, s: &str) -> usize {
        self.write(s.as_bytes())
    }

    /// Empties the buffer while retaining its allocation.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Shortens the buffer to `n` bytes.
    ///
    /// A no-op when `n` is greater than or equal to the current length;
    /// truncation never grows the buffer.
    pub fn truncate(&mut self, n: usize) {
        if n < self.data.len() {
            self.data.truncate(n);
        }
    }

    /// Copies the byte range `[start, end)` into a new buffer.
    ///
    /// Out-of-range indices are clamped to the valid contents, and an
    /// inverted range yields an empty buffer. The returned buffer is
    /// detached: later writes to `self` are not visible through it.
    pub fn slice(&self, start: usize, end: usize) -> Buffer {
        let len = self.data.len();
        let start = start.min(len);
        let end = end.min(len).max(start);
        Buffer {
            data: self.data[start..end].to_vec(),
        }
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
        }
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<&str> for Buffer {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Buffer::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.data.len())
            .field("capacity", &self.data.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty_with_default_capacity() {
        let buf = Buffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert!(buf.capacity() >= INITIAL_CAPACITY);
    }

    #[test]
    fn test_write_appends() {
        let mut buf = Buffer::new();
        assert_eq!(buf.write(b"hello"), 5);
        assert_eq!(buf.write_str(", world"), 7);
        assert_eq!(buf.bytes(), b"hello, world");
        assert_eq!(buf.len(), 12);
    }

    #[test]
    fn test_write_grows_past_initial_capacity() {
        let mut buf = Buffer::with_capacity(4);
        let payload = vec![0xAB; 4096];
        buf.write(&payload);
        assert_eq!(buf.len(), 4096);
        assert_eq!(buf.bytes(), payload.as_slice());
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut buf = Buffer::new();
        buf.write(&[1u8; 2048]);
        let cap = buf.capacity();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_truncate_shortens() {
        let mut buf = Buffer::from("hello, world");
        buf.truncate(5);
        assert_eq!(buf.bytes(), b"hello");
    }

    #[test]
    fn test_truncate_at_or_past_len_is_noop() {
        let mut buf = Buffer::from("hello");
        buf.truncate(5);
        assert_eq!(buf.bytes(), b"hello");
        buf.truncate(100);
        assert_eq!(buf.bytes(), b"hello");
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_slice_copies_range() {
        let buf = Buffer::from("hello, world");
        let slice = buf.slice(7, 12);
        assert_eq!(slice.bytes(), b"world");
    }

    #[test]
    fn test_slice_unaffected_by_later_writes() {
        let mut buf = Buffer::from("hello");
        let slice = buf.slice(0, 5);
        buf.write_str(" and more");
        buf.truncate(2);
        assert_eq!(slice.bytes(), b"hello");
    }

    #[test]
    fn test_slice_clamps_out_of_range() {
        let buf = Buffer::from("abc");
        assert_eq!(buf.slice(1, 100).bytes(), b"bc");
        assert_eq!(buf.slice(50, 100).bytes(), b"");
        assert_eq!(buf.slice(2, 1).bytes(), b"");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut buf = Buffer::from("original");
        let clone = buf.clone();
        buf.reset();
        buf.write_str("rewritten");
        assert_eq!(clone.bytes(), b"original");
    }

    #[test]
    fn test_io_write_compat() {
        use std::io::Write;

        let mut buf = Buffer::new();
        write!(buf, "id={}", 42).unwrap();
        assert_eq!(buf.bytes(), b"id=42");
    }
}

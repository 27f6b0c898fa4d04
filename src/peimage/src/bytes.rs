//! Byte-Range Provider: an abstract, immutable, contiguous byte sequence of
//! known length, backed either by a memory-mapped file or a caller-supplied
//! buffer.

use std::ops::Deref;

use memmap2::Mmap;

/// Owns or borrows the bytes an [`crate::Image`] parses.
///
/// A `Mapped` source owns its OS-level file mapping and releases it on
/// drop. A `Borrowed` source is a plain slice the caller retains ownership
/// of — its lifetime must outlive the `Image` built on top of it, which the
/// borrow checker enforces via the `'a` parameter. An `Owned` source is for
/// callers that hand over a `Vec<u8>` they no longer need (e.g. bytes
/// already read off the network).
pub enum ByteSource<'a> {
    Mapped(Mmap),
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

impl<'a> Deref for ByteSource<'a> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ByteSource::Mapped(m) => m,
            ByteSource::Borrowed(b) => b,
            ByteSource::Owned(v) => v,
        }
    }
}

impl<'a> AsRef<[u8]> for ByteSource<'a> {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

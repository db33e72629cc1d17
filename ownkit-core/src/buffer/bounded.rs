//! ## ownkit-core::buffer::bounded
//! **Fixed-capacity, null-terminated line buffer**
//!
//! The buffer owns one heap allocation of exactly `capacity` bytes. Content is
//! kept C-style: `length` bytes of text followed by a `0` terminator, so at most
//! `capacity - 1` bytes are ever used for text.
//!
//! Ownership operations:
//! - `clone` / `clone_from`: deep copy into independent storage
//! - `take` / `assign_from`: transfer storage, leaving the source moved-from
//! - `Drop`: releases storage once; a moved-from buffer has nothing to release

use std::fmt;

use tracing::{debug, trace};

use crate::alloc::try_filled;
use crate::error::CoreError;

/// An owned, fixed-capacity text buffer that appends whole lines or nothing.
///
/// The `Default` value is the moved-from state: no storage, zero length and
/// zero capacity.
#[derive(Default)]
pub struct BoundedBuffer {
    buffer: Option<Box<[u8]>>,
    length: usize,
}

impl BoundedBuffer {
    /// Allocates a zero-length buffer with room for `capacity` bytes,
    /// terminator included.
    ///
    /// # Errors
    ///
    /// - `CoreError::InvalidArgument` if `capacity` is zero
    /// - `CoreError::OutOfMemory` if the storage cannot be allocated
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::invalid("buffer capacity must be at least 1"));
        }

        trace!(capacity, "allocating buffer");
        Ok(Self {
            buffer: Some(try_filled(capacity, 0u8)?.into_boxed_slice()),
            length: 0,
        })
    }

    /// Appends `text` followed by a newline.
    ///
    /// Returns `false` without touching the content when the line and the
    /// terminator do not fit, or when the buffer has been moved from. Like a
    /// C string, `text` is only read up to its first NUL byte.
    pub fn append_line(&mut self, text: &str) -> bool {
        let capacity = self.capacity();
        let Some(buffer) = self.buffer.as_mut() else {
            debug!("append to moved-from buffer rejected");
            return false;
        };

        let bytes = line_bytes(text);
        if self.length + bytes.len() + 2 > capacity {
            debug!(
                requested = bytes.len() + 1,
                length = self.length,
                capacity,
                "line does not fit"
            );
            return false;
        }

        let end = self.length + bytes.len();
        buffer[self.length..end].copy_from_slice(bytes);
        buffer[end] = b'\n';
        buffer[end + 1] = 0;
        self.length = end + 1;
        true
    }

    /// Same as [`append_line`](Self::append_line), reporting overflow as
    /// `CoreError::OutOfMemory`.
    pub fn try_append_line(&mut self, text: &str) -> Result<(), CoreError> {
        if self.append_line(text) {
            Ok(())
        } else {
            Err(CoreError::OutOfMemory {
                requested: line_bytes(text).len() + 1,
                available: self.remaining(),
            })
        }
    }

    /// Moves the storage out, leaving `self` in the moved-from state.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Move-assignment: drops the current storage, then takes `other`'s.
    pub fn assign_from(&mut self, other: &mut Self) {
        *self = other.take();
    }

    /// Number of text bytes, newlines included, terminator excluded.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Total storage size in bytes; zero once moved from.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.len())
    }

    /// Bytes still available for text and newlines. The terminator's slot is
    /// not counted.
    pub fn remaining(&self) -> usize {
        match &self.buffer {
            Some(buffer) => buffer.len() - self.length - 1,
            None => 0,
        }
    }

    #[inline]
    pub fn is_moved_from(&self) -> bool {
        self.buffer.is_none()
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.buffer {
            Some(buffer) => &buffer[..self.length],
            None => &[],
        }
    }

    /// Content followed by its `0` terminator. Empty once moved from.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        match &self.buffer {
            Some(buffer) => &buffer[..=self.length],
            None => &[],
        }
    }

    pub fn as_str(&self) -> &str {
        // Only whole `&str` prefixes ending before a NUL are copied in.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Renders the content behind a tag, `"<tag>: <content>"`.
    pub fn render(&self, tag: &str) -> String {
        format!("{tag}: {self}")
    }
}

impl Clone for BoundedBuffer {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            length: self.length,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        match (&mut self.buffer, &source.buffer) {
            (Some(dst), Some(src)) if dst.len() == src.len() => dst.copy_from_slice(src),
            _ => self.buffer = source.buffer.clone(),
        }
        self.length = source.length;
    }
}

impl Drop for BoundedBuffer {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            trace!(
                capacity = buffer.len(),
                length = self.length,
                "releasing buffer"
            );
        }
    }
}

impl PartialEq for BoundedBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for BoundedBuffer {}

impl fmt::Display for BoundedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for BoundedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("capacity", &self.capacity())
            .field("length", &self.length)
            .field("content", &self.as_str())
            .finish()
    }
}

/// The part of `text` before its first NUL byte.
fn line_bytes(text: &str) -> &[u8] {
    let bytes = text.as_bytes();
    match bytes.iter().position(|&b| b == 0) {
        Some(nul) => &bytes[..nul],
        None => bytes,
    }
}

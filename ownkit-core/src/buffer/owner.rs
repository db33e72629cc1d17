//! ## ownkit-core::buffer::owner
//! **Wrapper that owns a `BoundedBuffer` for its whole lifetime**
//!
//! Either builds its own small buffer seeded with one line, or takes an
//! existing buffer by move. Construction and destruction are reported through
//! `tracing`.

use tracing::info;

use super::bounded::BoundedBuffer;
use crate::error::CoreError;

pub struct BufferOwner {
    buffer: BoundedBuffer,
}

impl BufferOwner {
    /// Capacity used by [`BufferOwner::new`].
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Builds a `DEFAULT_CAPACITY` buffer holding `text` as its only line.
    pub fn new(text: &str) -> Result<Self, CoreError> {
        Self::with_capacity(Self::DEFAULT_CAPACITY, text)
    }

    /// # Errors
    ///
    /// - `CoreError::InvalidArgument` for a zero capacity
    /// - `CoreError::OutOfMemory` when `text` does not fit
    pub fn with_capacity(capacity: usize, text: &str) -> Result<Self, CoreError> {
        let mut buffer = BoundedBuffer::new(capacity)?;
        buffer.try_append_line(text)?;
        info!(content = %buffer.as_str().trim_end(), "constructed");
        Ok(Self { buffer })
    }

    /// Takes ownership of `buffer` without copying it.
    pub fn from_buffer(buffer: BoundedBuffer) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> &BoundedBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut BoundedBuffer {
        &mut self.buffer
    }

    /// Hands the buffer back, leaving this owner with a moved-from one.
    pub fn release(&mut self) -> BoundedBuffer {
        self.buffer.take()
    }
}

impl Drop for BufferOwner {
    fn drop(&mut self) {
        info!(content = %self.buffer.as_str().trim_end(), "about to destroy");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_new_holds_line() {
        let owner = BufferOwner::new("x").unwrap();
        assert_eq!(owner.buffer().as_str(), "x\n");
        assert_eq!(owner.buffer().capacity(), BufferOwner::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_new_rejects_long_line() {
        // Capacity 10 leaves room for 8 text bytes.
        assert!(BufferOwner::new("aaaaaaaa").is_ok());
        let err = BufferOwner::new("aaaaaaaaa").err().unwrap();
        assert!(matches!(err, CoreError::OutOfMemory { .. }));
    }

    #[test]
    fn test_error_propagates_after_earlier_owners() {
        fn nested() -> Result<(), CoreError> {
            let _a = BufferOwner::new("aaaaaa")?;
            let _b = BufferOwner::new("bbbbbbbb")?;
            let _c = BufferOwner::new("cccccccccccccc")?;
            let _d = BufferOwner::new("dddddd")?;
            Ok(())
        }
        assert!(matches!(nested(), Err(CoreError::OutOfMemory { .. })));
    }

    #[test]
    fn test_from_buffer_moves() {
        let mut buf = BoundedBuffer::new(32).unwrap();
        buf.append_line("moved in");
        let owner = BufferOwner::from_buffer(buf.take());
        assert!(buf.is_moved_from());
        assert_eq!(owner.buffer().as_str(), "moved in\n");
    }

    #[test]
    fn test_release() {
        let mut owner = BufferOwner::new("y").unwrap();
        let buf = owner.release();
        assert_eq!(buf.as_str(), "y\n");
        assert!(owner.buffer().is_moved_from());
    }

    #[traced_test]
    #[test]
    fn test_lifecycle_is_logged() {
        {
            let _owner = BufferOwner::new("x").unwrap();
            assert!(logs_contain("constructed"));
        }
        assert!(logs_contain("about to destroy"));
    }
}

//! ## ownkit-core::buffer
//! **Owned fixed-capacity text buffers**
//!
//! ### Key Submodules:
//! - `bounded/`: `BoundedBuffer`, append-or-fail line buffer with explicit copy/move
//! - `owner/`: `BufferOwner`, a wrapper that owns one buffer for its lifetime

pub mod bounded;
pub mod owner;

pub use bounded::BoundedBuffer;
pub use owner::BufferOwner;

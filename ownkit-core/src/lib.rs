//! # ownkit-core
//!
//! Small owning resource types with explicit copy and move discipline.
//!
//! ### Key Submodules:
//! - `buffer`: fixed-capacity, null-terminated line buffer and its owner wrapper
//! - `alloc`: fixed-size bucket allocator and its counters
//! - `timer`: named lifetime tracker that reports its age when dropped
//!
//! ### Threading:
//! Nothing in this crate locks internally. Every mutating operation takes
//! `&mut self`; sharing across threads is the caller's job. The one exception
//! is [`alloc::heap::global`], which hands out a process-wide heap behind a
//! mutex.

pub mod alloc;
pub mod buffer;
pub mod error;
pub mod timer;

pub mod prelude {
    pub use crate::alloc::*;
    pub use crate::buffer::*;
    pub use crate::error::*;
    pub use crate::timer::*;
}

pub use error::CoreError;

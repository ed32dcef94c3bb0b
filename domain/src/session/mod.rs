//! Model response streaming.
//!
//! - [`stream::Fragment`]: one incremental unit of a streamed response

pub mod stream;

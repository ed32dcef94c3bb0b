//! Application-level configuration.
//!
//! - [`ChatParams`]: chat session controller behavior (scroll debounce)

pub mod chat_params;

pub use chat_params::ChatParams;

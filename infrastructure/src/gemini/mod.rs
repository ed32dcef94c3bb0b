//! Gemini model adapter
//!
//! Speaks the `streamGenerateContent` SSE API and drives the automatic
//! function-calling loop behind the [`ModelRuntime`] port.
//!
//! [`ModelRuntime`]: mapchat_application::ModelRuntime

pub mod client;
pub mod protocol;
pub mod runtime;
pub mod stream;

pub use client::{GenerateContentApi, HttpGenerateContentApi};
pub use runtime::{GeminiRuntime, GeminiSettings};

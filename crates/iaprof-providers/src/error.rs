//! Provider error types.
//!
//! Re-exported from `iaprof-core` so the mentor can classify failures for
//! retry decisions by downcasting.

pub use iaprof_core::error::ProviderError;

//! iaprof-providers — generative-model provider integrations.
//!
//! Implements the `LlmProvider` trait for the Gemini `generateContent` API,
//! plus a scripted mock, and loads the `iaprof.toml` configuration.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;

pub use config::{
    create_provider, load_config, load_config_from, IaprofConfig, ModelsConfig, ProviderConfig,
};
pub use error::ProviderError;

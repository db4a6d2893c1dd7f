//! Google Generative AI backend for Hearth
//!
//! Implements the [`hearth::GenerativeChat`] port on top of the
//! `generateContent` REST endpoint.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hearth_google::{GoogleConfig, GoogleGenerativeClient};
//!
//! let config = GoogleConfig::from_env()?;
//! let client = GoogleGenerativeClient::new(config)?;
//! ```

mod client;
mod config;
mod wire;

pub use client::GoogleGenerativeClient;
pub use config::{ConfigError, GoogleConfig};

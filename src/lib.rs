//! The Rust client for Outbound, a marketing automation platform.
//!
//! # Overview
//!
//! The client reports users and their behavior to Outbound. Users are identified by a string or
//! numeric id and carry traits like name, email, device tokens, and free-form attributes. Events
//! are named actions performed by a user, with optional properties.
//!
//! Every operation is a small builder obtained from a [`Client`] (or from the process-wide client
//! set up with [`init`]). Nothing happens until `send()` is called:
//!
//! ```no_run
//! use serde_json::json;
//!
//! let client = outbound::ClientConfig::from_api_key("api-key").to_client()?;
//!
//! client
//!     .identify("user-1")
//!     .first_name("Ada")
//!     .email("ada@example.com")
//!     .attributes(json!({"plan": "pro"}))
//!     .send()?;
//!
//! client
//!     .track("user-1", "signed_up")
//!     .properties(json!({"referrer": "newsletter"}))
//!     .send()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum, and each carries a stable [`ErrorCode`].
//!
//! `send()` returns the outcome and also reports it to the handlers attached to the request:
//! exactly one of `on_error` or `on_success` is called, at most once. Callers who do not care may
//! ignore both; reporting to Outbound should never be critical enough to cause crashes.
//!
//! Invalid optional fields (e.g., a non-string in a token list) are dropped with a warning
//! instead of failing the whole request.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages under
//! the `outbound` target. Consider integrating a `log`-compatible logger implementation for better
//! visibility into client operations.
//!
//! # Examples
//!
//! A runnable example can be found in the `demos/` directory of the `outbound` crate repository.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod client;
mod config;
mod dispatcher;
mod error;
mod global;
mod payload;
mod reporter;
mod request;
mod transport;
mod validate;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ConfigError, Error, ErrorCode, Operation, Result};
pub use global::{
    alias, disable_all_tokens, disable_token, identify, init, init_with_config, is_initialized,
    register_token, subscribe, track, unsubscribe,
};
pub use payload::UserTraits;
pub use reporter::{ErrorHandler, SuccessHandler};
pub use request::{Alias, DeviceToken, Identify, Platform, Subscription, Track, UnknownPlatform};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

//! Core library for the `tripdesk` CLI.
//!
//! This crate defines:
//! - Session credentials and on-disk service settings
//! - Clients for the chat, weather, exchange-rate and stock-index services
//! - The trip-planning and market-info flows built on top of them
//!
//! It is used by `tripdesk-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod credentials;
pub mod currency;
pub mod error;
pub mod flow;
mod http;
pub mod markets;
pub mod model;
pub mod provider;

pub use config::Settings;
pub use credentials::{ApiKey, CredentialKind, Credentials};
pub use error::{Error, Result};
pub use model::{MarketReport, TripReport, TripRequest};
pub use provider::Services;

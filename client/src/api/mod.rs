//! Typed client for the Lodge REST API.
//!
//! [`http::ApiClient`] owns the transport and error normalization; the
//! per-resource modules are thin path-and-payload wrappers over it.

pub mod channels;
pub mod guilds;
pub mod http;
pub mod logs;
pub mod models;

pub use http::{ApiClient, ApiError};

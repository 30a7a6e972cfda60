//! HTTP client wrapper.
//!
//! Every request made through [`ApiClient`] carries the stored bearer token,
//! and every 401 answer invalidates that token and redirects to the login
//! view through the configured [`Navigator`].

mod client;
mod config;
mod endpoints;
mod navigator;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use endpoints::LoginResponse;
pub(crate) use endpoints::*;
pub use navigator::{History, Navigator};

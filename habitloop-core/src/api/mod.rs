//! HTTP client for the habit backend.
//!
//! All domain data lives on the backend; this module is the only
//! place the client talks to it. See [`client::ApiClient`].

pub mod client;

pub use client::ApiClient;

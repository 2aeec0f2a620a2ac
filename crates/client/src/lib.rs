//! Netdisk REST client.
//!
//! Async client for the `/xpan/file` and superfile endpoints, with the
//! access token attached to every request and service `errno` codes
//! surfaced as errors.

pub mod client;

pub use client::{Client, Error};
pub use netdisk_protocol::constants::{DEFAULT_API_BASE, DEFAULT_UPLOAD_URL};

//! HTTP API Client
//!
//! Functions for communicating with the ResolveIT REST API, grouped by
//! resource.

pub mod auth;
mod client;
pub mod complaints;
pub mod directory;
pub mod notifications;
pub mod students;

pub use client::{get_api_base, set_api_base, set_token};

//! API Routes
//!
//! Route handlers organized by functionality.

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod directory;
pub mod export;
pub mod health;
pub mod notifications;
pub mod students;

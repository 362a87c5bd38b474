//! ResolveIT Dashboard
//!
//! Grievance tracking interface built with Leptos (WASM).
//!
//! # Features
//!
//! - Sign in and registration
//! - Complaint submission with optional evidence
//! - Status timeline with staff and owner actions
//! - Reports with CSV export
//! - Student directory
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Every page is a view over the ResolveIT REST API.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}

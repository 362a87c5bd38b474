//! State Management
//!
//! Session state, wire models and the pure helpers pages build on.

pub mod global;
pub mod models;
pub mod timeline;
pub mod validation;

pub use global::{provide_global_state, use_global_state, GlobalState};
pub use models::{
    Attachment, Category, Complaint, ComplaintDraft, Notification, Session, Stats, Student,
    StudentInput, TimelineEntry, User,
};

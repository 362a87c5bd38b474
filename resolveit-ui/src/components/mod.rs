//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod loading;
pub mod nav;
pub mod stat_card;
pub mod status_badge;
pub mod timeline;
pub mod toast;

pub use loading::{ListSkeleton, Loading};
pub use nav::Nav;
pub use stat_card::StatCard;
pub use status_badge::{PriorityBadge, StatusBadge};
pub use timeline::Timeline;
pub use toast::Toast;

//! ResolveIT Store
//!
//! SQLite persistence for every record the service keeps:
//!
//! - **types**: Domain records (User, Complaint, TimelineEntry, Student, ...)
//! - **db**: Connection handle, schema and enum column codecs
//! - **users**, **complaints**, **students**, **categories**, **notifications**:
//!   Per-table operations implemented on `Database`
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use resolveit::store::{Database, NewComplaint, Priority};
//! use chrono::Utc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open(std::path::Path::new("./data/resolveit.db"))?;
//!     db.seed_default_categories()?;
//!
//!     let complaint = db.insert_complaint(
//!         &NewComplaint {
//!             title: "Broken projector".into(),
//!             description: "Room 204".into(),
//!             category: "Infrastructure".into(),
//!             priority: Priority::High,
//!             is_anonymous: false,
//!             anonymous_email: None,
//!             user_id: None,
//!         },
//!         None,
//!         None,
//!         Utc::now(),
//!     )?;
//!     println!("Stored complaint #{}", complaint.complaint_id);
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod complaints;
pub mod db;
pub mod error;
pub mod notifications;
pub mod students;
pub mod types;
pub mod users;

pub use categories::DEFAULT_CATEGORIES;
pub use complaints::{NewAttachment, NewComplaint};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use notifications::NewNotification;
pub use types::*;
pub use users::StoredUser;

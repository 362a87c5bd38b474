//! Pages
//!
//! Top-level page components for each route.

pub mod complaint_status;
pub mod dashboard;
pub mod login;
pub mod my_complaints;
pub mod profile;
pub mod register;
pub mod reports;
pub mod student_form;
pub mod students;
pub mod submit_complaint;

pub use complaint_status::ComplaintStatus;
pub use dashboard::Dashboard;
pub use login::Login;
pub use my_complaints::MyComplaints;
pub use profile::Profile;
pub use register::Register;
pub use reports::Reports;
pub use student_form::StudentForm;
pub use students::Students;
pub use submit_complaint::SubmitComplaint;

/// Shared input styling
pub(crate) const INPUT_CLASS: &str = "w-full rounded-lg px-4 py-3 border border-gray-300 \
     focus:border-indigo-500 focus:outline-none";

pub(crate) const PRIMARY_BUTTON: &str = "px-6 py-3 bg-indigo-600 hover:bg-indigo-700 \
     disabled:bg-gray-400 text-white rounded-lg font-medium transition-colors";

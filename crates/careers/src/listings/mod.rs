//! Job board snapshot: fetch the postings once, keep them in an immutable
//! board value, and expose only the active ones to callers.

pub mod board;
pub mod domain;
pub mod source;

pub use board::JobBoard;
pub use domain::{JobId, JobPosting, ACTIVE_STATUS};
pub use source::{HttpJobListingSource, JobListingSource, ListingError};

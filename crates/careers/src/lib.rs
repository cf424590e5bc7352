//! Careers site backend: the job board fetcher, the application modal state
//! machine and the mail relay that turns an application into an email.

pub mod applications;
pub mod config;
pub mod error;
pub mod listings;
pub mod telemetry;

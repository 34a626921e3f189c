//! Payload shapes exchanged with the recruitment backend (camelCase on the wire).

pub mod application;
pub mod insights;
pub mod job;
pub mod lenient;
pub mod resume;
pub mod user;

// Typed wrappers for the recruitment backend's REST endpoints.
// Every call goes through the AuthGateway; no module builds its own HTTP client.

pub mod auth;
pub mod insights;
pub mod jobs;
pub mod jobseeker;
pub mod recruiter;

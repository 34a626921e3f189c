//! Route table: every navigable view and the access requirement attached to it.

pub mod guard;
pub mod navigator;

use std::fmt;

use uuid::Uuid;

use crate::session::Role;

pub use guard::{guard, DenyReason, GuardDecision};
pub use navigator::{Navigation, Navigator, Redirect};

const JOB_SEEKER_ONLY: &[Role] = &[Role::JobSeeker];
const RECRUITER_ONLY: &[Role] = &[Role::Recruiter];

/// Who may reach a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Anyone, in any session state.
    Public,
    /// Only without a session (login / register forms).
    PublicOnly,
    /// Any authenticated identity.
    Protected,
    /// Authenticated, and the identity's role is in the set.
    ProtectedByRole(&'static [Role]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Jobs,
    JobDetails(Uuid),
    JobSeekerDashboard,
    JobSeekerProfile,
    JobSeekerResume,
    JobSeekerApplications,
    JobSeekerInsights { job_id: Option<Uuid> },
    RecruiterDashboard,
    RecruiterProfile,
    RecruiterPostJob,
    RecruiterJobs,
    RecruiterCandidates { job_id: Option<Uuid> },
    RecruiterSourcing,
    RecruiterInsights { job_id: Option<Uuid> },
}

impl Route {
    /// The view unauthenticated users are sent to.
    pub const LOGIN: Route = Route::Login;
    /// The neutral view every other denial lands on.
    pub const DEFAULT: Route = Route::Home;

    /// Parses a location such as `/jobs/<id>` or `/recruiter/candidates?jobId=<id>`.
    /// Returns `None` for paths outside the table.
    pub fn parse(location: &str) -> Option<Route> {
        let (path, query) = match location.trim().split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (location.trim(), None),
        };
        let job_id = query.and_then(|q| query_param(q, "jobId")).and_then(|v| v.parse().ok());

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["jobs"] => Route::Jobs,
            ["jobs", id] => Route::JobDetails(id.parse().ok()?),
            ["jobseeker", "dashboard"] => Route::JobSeekerDashboard,
            ["jobseeker", "profile"] => Route::JobSeekerProfile,
            ["jobseeker", "resume"] => Route::JobSeekerResume,
            ["jobseeker", "applications"] => Route::JobSeekerApplications,
            ["jobseeker", "insights"] => Route::JobSeekerInsights { job_id },
            ["recruiter", "dashboard"] => Route::RecruiterDashboard,
            ["recruiter", "profile"] => Route::RecruiterProfile,
            ["recruiter", "post-job"] => Route::RecruiterPostJob,
            ["recruiter", "jobs"] => Route::RecruiterJobs,
            ["recruiter", "candidates"] => Route::RecruiterCandidates { job_id },
            ["recruiter", "sourcing"] => Route::RecruiterSourcing,
            ["recruiter", "insights"] => Route::RecruiterInsights { job_id },
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        let with_job = |base: &str, job_id: &Option<Uuid>| match job_id {
            Some(id) => format!("{base}?jobId={id}"),
            None => base.to_string(),
        };

        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::JobDetails(id) => format!("/jobs/{id}"),
            Route::JobSeekerDashboard => "/jobseeker/dashboard".to_string(),
            Route::JobSeekerProfile => "/jobseeker/profile".to_string(),
            Route::JobSeekerResume => "/jobseeker/resume".to_string(),
            Route::JobSeekerApplications => "/jobseeker/applications".to_string(),
            Route::JobSeekerInsights { job_id } => with_job("/jobseeker/insights", job_id),
            Route::RecruiterDashboard => "/recruiter/dashboard".to_string(),
            Route::RecruiterProfile => "/recruiter/profile".to_string(),
            Route::RecruiterPostJob => "/recruiter/post-job".to_string(),
            Route::RecruiterJobs => "/recruiter/jobs".to_string(),
            Route::RecruiterCandidates { job_id } => with_job("/recruiter/candidates", job_id),
            Route::RecruiterSourcing => "/recruiter/sourcing".to_string(),
            Route::RecruiterInsights { job_id } => with_job("/recruiter/insights", job_id),
        }
    }

    pub fn requirement(&self) -> RouteRequirement {
        match self {
            Route::Home => RouteRequirement::Public,
            Route::Login | Route::Register => RouteRequirement::PublicOnly,
            Route::Jobs | Route::JobDetails(_) => RouteRequirement::Protected,
            Route::JobSeekerDashboard
            | Route::JobSeekerProfile
            | Route::JobSeekerResume
            | Route::JobSeekerApplications
            | Route::JobSeekerInsights { .. } => RouteRequirement::ProtectedByRole(JOB_SEEKER_ONLY),
            Route::RecruiterDashboard
            | Route::RecruiterProfile
            | Route::RecruiterPostJob
            | Route::RecruiterJobs
            | Route::RecruiterCandidates { .. }
            | Route::RecruiterSourcing
            | Route::RecruiterInsights { .. } => RouteRequirement::ProtectedByRole(RECRUITER_ONLY),
        }
    }

    /// Landing view after login for a role.
    pub fn dashboard_for(role: Role) -> Route {
        match role {
            Role::JobSeeker => Route::JobSeekerDashboard,
            Role::Recruiter => Route::RecruiterDashboard,
            Role::Admin => Route::Home,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

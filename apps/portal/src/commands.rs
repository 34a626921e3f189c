//! Runs one CLI command. Each command first navigates to the view it belongs to, so the
//! route guard applies to actions exactly as it does to `portal open`.

use std::path::Path;

use tracing::{info, warn};

use crate::api::{auth, insights, jobs, jobseeker, recruiter};
use crate::cli::{Command, RegisterArgs};
use crate::errors::ClientError;
use crate::gateway::AuthGateway;
use crate::models::application::JobApplicationRequest;
use crate::models::job::JobPostRequest;
use crate::models::user::{JobSeekerProfile, LoginRequest, RecruiterProfile, RegisterRequest};
use crate::routes::{DenyReason, Navigation, Navigator, Redirect, Route};
use crate::session::{Readiness, Role, SessionManager};
use crate::views;

/// What a command produced, for the shell to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    /// The guard refused the command's view.
    Denied(String),
    /// The backend ended the session while the command ran.
    SessionExpired,
}

pub async fn execute(
    command: Command,
    gateway: &AuthGateway,
    session: &SessionManager,
    nav: &mut Navigator,
) -> Result<Outcome, ClientError> {
    let result = dispatch(command, gateway, session, nav).await;
    if let Some(route) = nav.sync() {
        warn!("Session invalidated; now at {route}");
        return Ok(Outcome::SessionExpired);
    }
    result
}

async fn dispatch(
    command: Command,
    gateway: &AuthGateway,
    session: &SessionManager,
    nav: &mut Navigator,
) -> Result<Outcome, ClientError> {
    match command {
        Command::Open { path } => match nav.navigate(&path) {
            Navigation::Pending => Ok(Outcome::Denied(LOADING.to_string())),
            Navigation::Render { route, redirects } => {
                let mut text = String::new();
                if let Some(first) = redirects.first() {
                    text.push_str(&denial(first, session));
                    text.push('\n');
                }
                text.push_str(&views::render(&route, gateway, session).await?);
                Ok(Outcome::Output(text))
            }
        },

        Command::Login { email, password, portal } => {
            if let Err(denied) = enter(nav, session, &Route::Login) {
                return Ok(denied);
            }
            let identity = auth::login(gateway, session, portal, &LoginRequest { email, password }).await?;
            landing(gateway, session, nav, identity.role, format!("Signed in as {}", identity.email)).await
        }

        Command::Register(args) => {
            if let Err(denied) = enter(nav, session, &Route::Register) {
                return Ok(denied);
            }
            let identity = auth::register(gateway, session, &RegisterRequest::from(args)).await?;
            landing(
                gateway,
                session,
                nav,
                identity.role,
                format!("Account created for {}", identity.email),
            )
            .await
        }

        Command::Logout => {
            if !session.is_authenticated() {
                return Ok(Outcome::Output("Not signed in.".to_string()));
            }
            auth::logout(session)?;
            Ok(Outcome::Output("Signed out.".to_string()))
        }

        Command::Whoami => Ok(Outcome::Output(match session.readiness() {
            Readiness::Authenticated(identity) => {
                let can = match identity.role {
                    Role::Recruiter => "post jobs and review candidates",
                    Role::JobSeeker => "search and apply to jobs",
                    Role::Admin => "browse the portal",
                };
                format!(
                    "{} ({}), user id {}\nYou can {can}. Dashboard: {}",
                    identity.email,
                    identity.role,
                    identity.user_id,
                    Route::dashboard_for(identity.role)
                )
            }
            Readiness::Anonymous => "Not signed in.".to_string(),
            Readiness::Loading => LOADING.to_string(),
        })),

        Command::Search { keyword } => {
            if let Err(denied) = enter(nav, session, &Route::Jobs) {
                return Ok(denied);
            }
            let found = jobs::search(gateway, &keyword).await?;
            Ok(Outcome::Output(views::job_list(
                &format!("Jobs matching '{}'", keyword.trim()),
                &found,
            )))
        }

        Command::Filter { location, job_type } => {
            if let Err(denied) = enter(nav, session, &Route::Jobs) {
                return Ok(denied);
            }
            let found = jobs::filter(gateway, location.as_deref(), job_type).await?;
            Ok(Outcome::Output(views::job_list("Filtered jobs", &found)))
        }

        Command::Apply { job_id, cover_letter } => {
            if let Err(denied) = enter(nav, session, &Route::JobSeekerApplications) {
                return Ok(denied);
            }
            let request = JobApplicationRequest {
                job_posting_id: job_id,
                cover_letter,
            };
            let application = jobseeker::apply(gateway, &request).await?;
            info!("Applied to {job_id}");
            Ok(Outcome::Output(format!(
                "Application {} submitted ({})",
                application.id,
                application
                    .parsed_status()
                    .map(|s| s.label())
                    .unwrap_or("Applied")
            )))
        }

        Command::UploadResume { file } => {
            if let Err(denied) = enter(nav, session, &Route::JobSeekerResume) {
                return Ok(denied);
            }
            let response = jobseeker::upload_resume(gateway, &file).await?;
            Ok(Outcome::Output(format!(
                "Uploaded {}\n{}",
                file.display(),
                views::pretty(&response)?
            )))
        }

        Command::DeleteResume { resume_id } => {
            if let Err(denied) = enter(nav, session, &Route::JobSeekerResume) {
                return Ok(denied);
            }
            jobseeker::delete_resume(gateway, resume_id).await?;
            Ok(Outcome::Output(format!("Deleted resume {resume_id}")))
        }

        Command::PrimaryResume { resume_id } => {
            if let Err(denied) = enter(nav, session, &Route::JobSeekerResume) {
                return Ok(denied);
            }
            let resume = jobseeker::set_primary_resume(gateway, resume_id).await?;
            Ok(Outcome::Output(format!(
                "Primary resume is now {}",
                resume.file_name.clone().unwrap_or_else(|| resume.id.to_string())
            )))
        }

        Command::UpdateProfile { file } => {
            let route = if session.is_recruiter() {
                Route::RecruiterProfile
            } else {
                Route::JobSeekerProfile
            };
            if let Err(denied) = enter(nav, session, &route) {
                return Ok(denied);
            }
            let raw = read_profile(&file).await?;
            let saved = if route == Route::RecruiterProfile {
                let profile: RecruiterProfile = serde_json::from_str(&raw)?;
                views::pretty(&recruiter::update_profile(gateway, &profile).await?)?
            } else {
                let profile: JobSeekerProfile = serde_json::from_str(&raw)?;
                views::pretty(&jobseeker::update_profile(gateway, &profile).await?)?
            };
            Ok(Outcome::Output(format!("Profile updated\n{saved}")))
        }

        Command::PostJob(args) => {
            if let Err(denied) = enter(nav, session, &Route::RecruiterPostJob) {
                return Ok(denied);
            }
            let job = recruiter::create_job(gateway, &JobPostRequest::from(args)).await?;
            Ok(Outcome::Output(format!("Posted {} ({})", job.title, job.id)))
        }

        Command::UpdateJob { job_id, job } => {
            if let Err(denied) = enter(nav, session, &Route::RecruiterJobs) {
                return Ok(denied);
            }
            let job = recruiter::update_job(gateway, job_id, &JobPostRequest::from(job)).await?;
            Ok(Outcome::Output(format!("Updated {} ({})", job.title, job.id)))
        }

        Command::DeleteJob { job_id } => {
            if let Err(denied) = enter(nav, session, &Route::RecruiterJobs) {
                return Ok(denied);
            }
            recruiter::delete_job(gateway, job_id).await?;
            Ok(Outcome::Output(format!("Deleted job {job_id}")))
        }

        Command::SetStatus { application_id, status } => {
            if let Err(denied) = enter(nav, session, &Route::RecruiterCandidates { job_id: None }) {
                return Ok(denied);
            }
            let application = recruiter::update_application_status(gateway, application_id, status).await?;
            Ok(Outcome::Output(format!(
                "Application {} is now {}",
                application.id,
                application.parsed_status().unwrap_or(status)
            )))
        }

        Command::Source { query } => {
            if let Err(denied) = enter(nav, session, &Route::RecruiterSourcing) {
                return Ok(denied);
            }
            let found = recruiter::search_candidates(gateway, &query).await?;
            let mut lines = vec![format!(
                "{} candidates{}",
                found.results.len(),
                found
                    .total_pool_size
                    .map(|size| format!(" from a pool of {size}"))
                    .unwrap_or_default()
            )];
            for candidate in &found.results {
                lines.push(views::pretty(candidate)?);
            }
            Ok(Outcome::Output(lines.join("\n")))
        }

        Command::Screen { job_id } => {
            if let Err(denied) = enter(nav, session, &Route::RecruiterInsights { job_id: Some(job_id) }) {
                return Ok(denied);
            }
            let screened = insights::screen_candidates(gateway, job_id).await?;
            let mut lines = vec![format!("Screened {} applicants", screened.len())];
            lines.extend(screened.iter().map(|c| {
                format!(
                    "  {} {} match {} skills: {}",
                    c.job_seeker_id,
                    c.name.as_deref().unwrap_or("-"),
                    views::score(c.match_score),
                    c.key_skills.join(", ")
                )
            }));
            Ok(Outcome::Output(lines.join("\n")))
        }

        Command::Match { job_id, method } => {
            if let Err(denied) = enter(nav, session, &Route::RecruiterInsights { job_id: Some(job_id) }) {
                return Ok(denied);
            }
            let matched = insights::advanced_match(gateway, job_id, method).await?;
            Ok(Outcome::Output(format!(
                "Advanced match ({method})\n{}",
                views::pretty(&matched)?
            )))
        }

        Command::PredictFit { job_seeker_id } => {
            if let Err(denied) = enter(nav, session, &Route::RecruiterInsights { job_id: None }) {
                return Ok(denied);
            }
            let fit = insights::predict_fit(gateway, job_seeker_id).await?;
            Ok(Outcome::Output(views::pretty(&fit)?))
        }
    }
}

const LOADING: &str = "Session is still loading; try again.";

/// Navigates to `route`. Any redirect means the command may not run here.
fn enter(nav: &mut Navigator, session: &SessionManager, route: &Route) -> Result<(), Outcome> {
    match nav.navigate(&route.path()) {
        Navigation::Pending => Err(Outcome::Denied(LOADING.to_string())),
        Navigation::Render { redirects, .. } => match redirects.first() {
            Some(first) => Err(Outcome::Denied(denial(first, session))),
            None => Ok(()),
        },
    }
}

fn denial(redirect: &Redirect, session: &SessionManager) -> String {
    match redirect.reason {
        DenyReason::NotAuthenticated => format!(
            "Sign in to use {}: portal login --email <email> --password <password>",
            redirect.from
        ),
        DenyReason::WrongRole => format!(
            "{} is not available to {} accounts",
            redirect.from,
            session
                .current_user()
                .map(|identity| identity.role.to_string())
                .unwrap_or_else(|| "your".to_string())
        ),
        DenyReason::AlreadyAuthenticated => format!(
            "Already signed in as {}. Run `portal logout` first.",
            session
                .current_user()
                .map(|identity| identity.email)
                .unwrap_or_default()
        ),
    }
}

/// After login or registration: move to the role's dashboard and show it.
async fn landing(
    gateway: &AuthGateway,
    session: &SessionManager,
    nav: &mut Navigator,
    role: Role,
    greeting: String,
) -> Result<Outcome, ClientError> {
    let dashboard = Route::dashboard_for(role);
    if let Err(Outcome::Denied(message)) = enter(nav, session, &dashboard) {
        return Ok(Outcome::Output(format!("{greeting}\n{message}")));
    }
    match views::render(&dashboard, gateway, session).await {
        Ok(view) => Ok(Outcome::Output(format!("{greeting}\n{view}"))),
        Err(err) if err.ends_session() => Err(err),
        Err(err) => {
            warn!("Dashboard failed to load: {err}");
            Ok(Outcome::Output(format!("{greeting}\nDashboard unavailable: {err}")))
        }
    }
}

async fn read_profile(path: &Path) -> Result<String, ClientError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| ClientError::Validation(format!("Cannot read {}: {err}", path.display())))
}

impl From<RegisterArgs> for RegisterRequest {
    fn from(args: RegisterArgs) -> Self {
        RegisterRequest {
            email: args.email,
            password: args.password,
            role: Some(args.role),
            first_name: args.first_name,
            last_name: args.last_name,
            phone: args.phone,
            location: args.location,
            company_name: args.company_name,
            company_description: args.company_description,
            company_size: args.company_size,
        }
    }
}

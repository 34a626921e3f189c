//! Views: what each route shows once the guard lets it render.
//!
//! A view fetches through the gateway and returns plain text; the shell prints it.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::api::{insights, jobseeker, jobs, recruiter};
use crate::errors::ClientError;
use crate::gateway::AuthGateway;
use crate::helpers::{format_date, format_salary, initials, truncate_text};
use crate::models::application::JobApplication;
use crate::models::insights::{Recommendation, SkillGap};
use crate::models::job::Job;
use crate::routes::Route;
use crate::session::SessionManager;

const DESCRIPTION_PREVIEW_CHARS: usize = 120;

pub async fn render(
    route: &Route,
    gateway: &AuthGateway,
    session: &SessionManager,
) -> Result<String, ClientError> {
    let text = match route {
        Route::Home => home(session),
        Route::Login => "Sign in with: portal login --email <email> --password <password>".to_string(),
        Route::Register => {
            "Create an account with: portal register --email <email> --password <password> --role <job-seeker|recruiter>"
                .to_string()
        }
        Route::Jobs => job_list("All jobs", &jobs::list_all(gateway).await?),
        Route::JobDetails(id) => job_details(gateway, session, *id).await?,
        Route::JobSeekerDashboard => seeker_dashboard(gateway).await?,
        Route::JobSeekerProfile => {
            let profile = jobseeker::get_profile(gateway).await?;
            format!(
                "[{}] {}\n{}",
                initials(profile.first_name.as_deref(), profile.last_name.as_deref()),
                [profile.first_name.as_deref(), profile.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" "),
                pretty(&profile)?
            )
        }
        Route::JobSeekerResume => {
            let resumes = jobseeker::list_resumes(gateway).await?;
            let mut lines = vec![format!("Resumes ({})", resumes.len())];
            lines.extend(resumes.iter().map(|r| {
                format!(
                    "  {} {} uploaded {}{}",
                    r.id,
                    r.file_name.as_deref().unwrap_or("(unnamed)"),
                    format_date(r.upload_date.as_ref()),
                    if r.is_primary { " [primary]" } else { "" }
                )
            }));
            lines.join("\n")
        }
        Route::JobSeekerApplications => {
            application_list("My applications", &jobseeker::list_applications(gateway).await?)
        }
        Route::JobSeekerInsights { job_id } => seeker_insights(gateway, *job_id).await?,
        Route::RecruiterDashboard => {
            let posted = recruiter::list_jobs(gateway).await?;
            let active = posted.iter().filter(|j| j.is_active.unwrap_or(true)).count();
            format!(
                "Recruiter dashboard: {} postings, {active} active\n{}",
                posted.len(),
                job_list("My postings", &posted)
            )
        }
        Route::RecruiterProfile => pretty(&recruiter::get_profile(gateway).await?)?,
        Route::RecruiterPostJob => {
            "Post a job with: portal post-job --title <title> --description <text> [--requirement <skill>]..."
                .to_string()
        }
        Route::RecruiterJobs => job_list("My postings", &recruiter::list_jobs(gateway).await?),
        Route::RecruiterCandidates { job_id: None } => {
            let posted = recruiter::list_jobs(gateway).await?;
            format!(
                "Pick a posting with: portal open '/recruiter/candidates?jobId=<id>'\n{}",
                job_list("My postings", &posted)
            )
        }
        Route::RecruiterCandidates { job_id: Some(job_id) } => application_list(
            &format!("Applicants for {job_id}"),
            &recruiter::job_applications(gateway, *job_id).await?,
        ),
        Route::RecruiterSourcing => format!(
            "Candidate clusters\n{}",
            pretty(&insights::clusters(gateway).await?)?
        ),
        Route::RecruiterInsights { job_id } => recruiter_insights(gateway, *job_id).await?,
    };
    Ok(text)
}

fn home(session: &SessionManager) -> String {
    match session.current_user() {
        Some(identity) if session.is_admin() => format!(
            "Welcome back, {}. Admin accounts have no dashboard in this client.",
            identity.email
        ),
        Some(identity) => format!(
            "Welcome back, {} ({}). Your dashboard: {}",
            identity.email,
            identity.role,
            Route::dashboard_for(identity.role)
        ),
        None => "Welcome to HirePortal. Run `portal login` or `portal register` to get started.".to_string(),
    }
}

async fn job_details(
    gateway: &AuthGateway,
    session: &SessionManager,
    job_id: Uuid,
) -> Result<String, ClientError> {
    let job = jobs::get_job(gateway, job_id).await?;
    let mut lines = vec![
        job.title.clone(),
        format!("  Company:  {}", job.company_name.as_deref().unwrap_or("-")),
        format!("  Location: {}", job.location.as_deref().unwrap_or("-")),
        format!("  Type:     {}", job.job_type.as_deref().unwrap_or("-")),
        format!("  Salary:   {}", format_salary(job.salary_min, job.salary_max)),
        format!("  Posted:   {}", format_date(job.posted_date.as_ref())),
    ];
    if let Some(description) = &job.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    if !job.requirements.is_empty() {
        lines.push(format!("Requirements: {}", job.requirements.join(", ")));
    }
    if session.is_job_seeker() {
        match jobseeker::skill_gap(gateway, job_id).await {
            Ok(gap) => lines.push(skill_gap_block(&gap)),
            Err(err) if err.ends_session() => return Err(err),
            Err(err) => {
                warn!("Skill gap for {job_id} failed: {err}");
                lines.push(format!("Skill analysis unavailable: {err}"));
            }
        }
    }
    Ok(lines.join("\n"))
}

async fn seeker_dashboard(gateway: &AuthGateway) -> Result<String, ClientError> {
    let recommended = jobseeker::recommendations(gateway).await?;
    let applications = jobseeker::list_applications(gateway).await?;
    Ok(format!(
        "{}\n{}",
        recommendation_list(&recommended),
        application_list("Recent applications", &applications)
    ))
}

async fn seeker_insights(gateway: &AuthGateway, job_id: Option<Uuid>) -> Result<String, ClientError> {
    let mut sections = vec![recommendation_list(&insights::recommendations(gateway).await?)];

    let paths = insights::career_paths(gateway).await?;
    let mut career = vec![format!("Career paths ({})", paths.len())];
    career.extend(paths.iter().map(|p| {
        format!(
            "  {} [{}] needs: {}",
            p.title,
            p.time_to_achieve.as_deref().unwrap_or("?"),
            p.required_skills.join(", ")
        )
    }));
    sections.push(career.join("\n"));

    if let Some(job_id) = job_id {
        sections.push(skill_gap_block(&insights::skill_gap(gateway, job_id).await?));
    }
    Ok(sections.join("\n"))
}

async fn recruiter_insights(gateway: &AuthGateway, job_id: Option<Uuid>) -> Result<String, ClientError> {
    let Some(job_id) = job_id else {
        return Ok(format!(
            "Pick a posting with: portal open '/recruiter/insights?jobId=<id>'\n{}",
            job_list("My postings", &recruiter::list_jobs(gateway).await?)
        ));
    };

    let list = insights::shortlist(gateway, job_id, insights::DEFAULT_SHORTLIST_LIMIT).await?;
    let mut lines = vec![format!(
        "Shortlist: {} of {} screened",
        list.shortlisted_candidates.len(),
        list.total_candidates_screened
    )];
    lines.extend(list.shortlisted_candidates.iter().map(|c| {
        format!(
            "  {} {} match {} skills: {}",
            c.job_seeker_id,
            c.name.as_deref().unwrap_or("-"),
            score(c.match_score),
            c.key_skills.join(", ")
        )
    }));

    let (bert, tfidf) = tokio::join!(
        insights::advanced_match(gateway, job_id, insights::MatchMethod::Bert),
        insights::advanced_match(gateway, job_id, insights::MatchMethod::Tfidf),
    );
    lines.push(format!("Advanced match (bert)\n{}", pretty(&bert?)?));
    lines.push(format!("Advanced match (tfidf)\n{}", pretty(&tfidf?)?));
    Ok(lines.join("\n"))
}

pub(crate) fn job_list(heading: &str, jobs: &[Job]) -> String {
    let mut lines = vec![format!("{heading} ({})", jobs.len())];
    lines.extend(jobs.iter().map(job_line));
    lines.join("\n")
}

fn job_line(job: &Job) -> String {
    let mut line = format!(
        "  {} {} @ {} | {} | {}",
        job.id,
        job.title,
        job.company_name.as_deref().unwrap_or("-"),
        job.location.as_deref().unwrap_or("-"),
        format_salary(job.salary_min, job.salary_max)
    );
    if let Some(description) = &job.description {
        line.push_str(&format!(
            "\n      {}",
            truncate_text(description, DESCRIPTION_PREVIEW_CHARS)
        ));
    }
    line
}

pub(crate) fn application_list(heading: &str, applications: &[JobApplication]) -> String {
    let mut lines = vec![format!("{heading} ({})", applications.len())];
    lines.extend(applications.iter().map(|a| {
        let status = match a.parsed_status() {
            Some(status) => status.label().to_string(),
            None => a.status.clone().unwrap_or_else(|| "-".to_string()),
        };
        let title = a.job_posting.as_ref().map(|j| j.title.as_str()).unwrap_or("-");
        format!(
            "  {} {title} | {status} | applied {} | AI match {}",
            a.id,
            format_date(a.applied_date.as_ref()),
            score(a.ai_match_score)
        )
    }));
    lines.join("\n")
}

fn recommendation_list(recommended: &[Recommendation]) -> String {
    let mut lines = vec![format!("Recommended jobs ({})", recommended.len())];
    lines.extend(recommended.iter().map(|r| {
        format!(
            "  {} {} | match {}{}",
            r.job.id,
            r.job.title,
            score(r.match_score),
            r.recommendation_reason
                .as_deref()
                .map(|reason| format!(" | {reason}"))
                .unwrap_or_default()
        )
    }));
    lines.join("\n")
}

fn skill_gap_block(gap: &SkillGap) -> String {
    let mut lines = vec![format!(
        "Skill match: {}",
        gap.overall_match_percentage
            .map(|p| format!("{p:.0}%"))
            .unwrap_or_else(|| "-".to_string())
    )];
    lines.push(format!("  Matching: {}", gap.matching_skills.join(", ")));
    lines.push(format!("  Missing:  {}", gap.missing_skills.join(", ")));
    for resource in &gap.learning_resources {
        if let (Some(skill), Some(url)) = (resource.get("skill"), resource.get("url")) {
            lines.push(format!("  Learn {skill}: {url}"));
        }
    }
    lines.join("\n")
}

pub(crate) fn score(value: Option<f64>) -> String {
    match value {
        Some(v) if v <= 1.0 => format!("{:.0}%", v * 100.0),
        Some(v) => format!("{v:.0}%"),
        None => "-".to_string(),
    }
}

pub(crate) fn pretty<T: Serialize>(value: &T) -> Result<String, ClientError> {
    Ok(serde_json::to_string_pretty(value)?)
}

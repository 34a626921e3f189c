//! Command-line surface. Every command is a navigation: it names the view it acts on,
//! and the route guard decides whether it may run.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::api::auth::LoginPortal;
use crate::api::insights::MatchMethod;
use crate::models::application::ApplicationStatus;
use crate::models::job::{JobPostRequest, JobType};
use crate::session::Role;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Terminal client for the HirePortal recruitment platform")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Keep the session in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a view by path, e.g. `/jobs` or `/recruiter/candidates?jobId=<id>`
    Open {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Sign in and open your dashboard
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,

        /// Login endpoint: any, recruiter, job-seeker
        #[arg(long = "as", default_value = "any")]
        portal: LoginPortal,
    },

    /// Create an account and open your dashboard
    Register(RegisterArgs),

    /// End the session on this machine
    Logout,

    /// Show the current session
    Whoami,

    /// Search jobs by keyword
    Search { keyword: String },

    /// Filter jobs by location and/or type
    Filter {
        #[arg(long)]
        location: Option<String>,

        /// full-time, part-time, contract, internship, freelance
        #[arg(long)]
        job_type: Option<JobType>,
    },

    /// Apply to a job
    Apply {
        job_id: Uuid,

        #[arg(long)]
        cover_letter: Option<String>,
    },

    /// Upload a resume (PDF, DOC or DOCX, up to 10MB)
    UploadResume { file: PathBuf },

    /// Delete one of your resumes
    DeleteResume { resume_id: Uuid },

    /// Make a resume your primary one
    PrimaryResume { resume_id: Uuid },

    /// Replace your profile with the JSON document in FILE
    UpdateProfile { file: PathBuf },

    /// Post a new job
    PostJob(JobArgs),

    /// Edit one of your postings
    UpdateJob {
        job_id: Uuid,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Delete one of your postings
    DeleteJob { job_id: Uuid },

    /// Move an application to a new status
    SetStatus {
        application_id: Uuid,

        /// applied, viewed, shortlisted, rejected, interview, offered
        status: ApplicationStatus,
    },

    /// Search the candidate pool in plain language
    Source { query: String },

    /// AI screening of the applicants to a posting
    Screen { job_id: Uuid },

    /// Advanced AI matching for a posting
    Match {
        job_id: Uuid,

        /// bert or tfidf
        #[arg(long, default_value = "bert")]
        method: MatchMethod,
    },

    /// AI fit prediction for a candidate
    PredictFit { job_seeker_id: Uuid },
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// job-seeker or recruiter
    #[arg(long)]
    pub role: Role,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub company_name: Option<String>,

    #[arg(long)]
    pub company_description: Option<String>,

    #[arg(long)]
    pub company_size: Option<String>,
}

#[derive(Args)]
pub struct JobArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Repeat for each requirement
    #[arg(long = "requirement")]
    pub requirements: Vec<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub salary_min: Option<f64>,

    #[arg(long)]
    pub salary_max: Option<f64>,

    #[arg(long)]
    pub job_type: Option<JobType>,

    /// Last day the posting accepts applications (YYYY-MM-DD)
    #[arg(long)]
    pub expires: Option<NaiveDate>,
}

impl From<JobArgs> for JobPostRequest {
    fn from(args: JobArgs) -> Self {
        JobPostRequest {
            title: args.title,
            description: args.description,
            requirements: args.requirements,
            location: args.location,
            salary_min: args.salary_min,
            salary_max: args.salary_max,
            job_type: args.job_type,
            expiry_date: args.expires,
        }
    }
}

//! AI insight endpoints. The client renders what comes back; no scoring happens here.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use uuid::Uuid;

use crate::errors::ClientError;
use crate::gateway::AuthGateway;
use crate::models::insights::{
    CandidateScreening, CandidateShortlist, CareerPath, Recommendation, SkillGap,
};

pub const DEFAULT_SHORTLIST_LIMIT: u32 = 10;

/// Matching model used by the advanced-match endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMethod {
    #[default]
    Bert,
    Tfidf,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Bert => "bert",
            MatchMethod::Tfidf => "tfidf",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bert" => Ok(MatchMethod::Bert),
            "tfidf" | "tf-idf" => Ok(MatchMethod::Tfidf),
            other => Err(format!("unknown match method '{other}'")),
        }
    }
}

// ── Job seeker ──────────────────────────────────────────────────────────────

pub async fn recommendations(gateway: &AuthGateway) -> Result<Vec<Recommendation>, ClientError> {
    gateway.get("/jobseeker/ai/recommendations").await
}

pub async fn skill_gap(gateway: &AuthGateway, job_id: Uuid) -> Result<SkillGap, ClientError> {
    gateway.get(&format!("/jobseeker/ai/skill-gap/{job_id}")).await
}

pub async fn career_paths(gateway: &AuthGateway) -> Result<Vec<CareerPath>, ClientError> {
    gateway.get("/jobseeker/ai/career-path").await
}

// ── Recruiter ───────────────────────────────────────────────────────────────

pub async fn screen_candidates(
    gateway: &AuthGateway,
    job_id: Uuid,
) -> Result<Vec<CandidateScreening>, ClientError> {
    gateway.get(&format!("/recruiter/ai/screen/{job_id}")).await
}

pub async fn shortlist(
    gateway: &AuthGateway,
    job_id: Uuid,
    limit: u32,
) -> Result<CandidateShortlist, ClientError> {
    gateway
        .get_query(&format!("/recruiter/ai/shortlist/{job_id}"), &[("limit", limit)])
        .await
}

pub async fn advanced_match(
    gateway: &AuthGateway,
    job_id: Uuid,
    method: MatchMethod,
) -> Result<Value, ClientError> {
    gateway
        .get_query(
            &format!("/recruiter/ai/advanced-match/{job_id}"),
            &[("method", method.as_str())],
        )
        .await
}

pub async fn predict_fit(gateway: &AuthGateway, job_seeker_id: Uuid) -> Result<Value, ClientError> {
    gateway
        .get(&format!("/recruiter/ai/predict-fit/{job_seeker_id}"))
        .await
}

pub async fn clusters(gateway: &AuthGateway) -> Result<Value, ClientError> {
    gateway.get("/recruiter/ai/clusters").await
}

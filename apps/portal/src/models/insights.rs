//! AI insight payloads. Scores are computed by the backend's AI service; the client only displays them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::job::Job;
use crate::models::lenient;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub job: Job,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub recommendation_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGap {
    pub job_posting_id: Option<Uuid>,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub missing_skills: Vec<String>,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub matching_skills: Vec<String>,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub learning_resources: Vec<HashMap<String, String>>,
    pub overall_match_percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPath {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub growth_potential: Option<String>,
    #[serde(default)]
    pub time_to_achieve: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScreening {
    pub job_seeker_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub key_skills: Vec<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub cultural_fit_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateShortlist {
    pub job_posting_id: Uuid,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub total_candidates_screened: u32,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub shortlisted_candidates: Vec<CandidateScreening>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub skill_clusters: HashMap<String, Vec<CandidateScreening>>,
}

/// Result of a free-text candidate pool search. Field names follow the AI service (snake_case).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateSearch {
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub results: Vec<Value>,
    pub total_pool_size: Option<u64>,
    pub status: Option<String>,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::lenient;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub upload_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub is_primary: bool,
    /// Whatever the parsing service extracted; rendered as-is.
    #[serde(default)]
    pub parsed_data: Option<Value>,
}

use serde::{Deserialize, Serialize};

/// Status flag of every Codeforces API response. On `FAILED` the `result`
/// field must not be trusted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiStatus {
    Ok,
    Failed,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ApiStatus,
    pub comment: Option<String>,
    pub result: Option<Vec<RatedUser>>,
}

/// One entry of the `user.ratedList` payload. Only the fields the dashboard
/// consumes are mapped; unknown fields are ignored.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RatedUser {
    pub handle: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    pub rank: Option<String>,
    pub max_rank: Option<String>,
    pub rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub contribution: Option<i32>,
    pub registration_time_seconds: i64,
}

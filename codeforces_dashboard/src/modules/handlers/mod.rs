pub mod users;

use crate::modules::store::Leaderboard;
use axum::{extract::Extension, http::StatusCode};
use codeforces_dashboard_libs::CodeforcesClient;
use std::sync::Arc;

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Ready once a non-empty user list has been fetched and cached.
pub async fn readiness(
    Extension(store): Extension<Arc<Leaderboard<CodeforcesClient>>>,
) -> StatusCode {
    if store.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

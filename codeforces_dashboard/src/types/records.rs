use chrono::{DateTime, NaiveDate};
use codeforces_dashboard_libs::codeforces::model::RatedUser;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Placeholder shown when an account has neither a first nor a last name.
pub const MISSING_NAME: &str = "—";

/// One enriched leaderboard entry. Produced once per fetch from the raw
/// API record and never mutated afterwards; filters work on borrowed
/// slices of the enriched set.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub handle: String,
    pub full_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    pub rank: Option<String>,
    pub max_rank: Option<String>,
    pub rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub contribution: Option<i32>,
    pub registration_time_seconds: i64,
    pub registration_date: NaiveDate,
    pub profile_url: String,
}

impl From<RatedUser> for UserRecord {
    fn from(user: RatedUser) -> Self {
        let full_name = join_name(user.first_name.as_deref(), user.last_name.as_deref());
        let registration_date = registration_date(user.registration_time_seconds);
        let profile_url = profile_url(&user.handle);

        Self {
            handle: user.handle,
            full_name,
            country: user.country,
            city: user.city,
            organization: user.organization,
            rank: user.rank,
            max_rank: user.max_rank,
            rating: user.rating,
            max_rating: user.max_rating,
            contribution: user.contribution,
            registration_time_seconds: user.registration_time_seconds,
            registration_date,
            profile_url,
        }
    }
}

fn join_name(first_name: Option<&str>, last_name: Option<&str>) -> String {
    let joined = [first_name, last_name].into_iter().flatten().join(" ");
    let joined = joined.trim();

    if joined.is_empty() {
        String::from(MISSING_NAME)
    } else {
        String::from(joined)
    }
}

/// UTC calendar date of the registration instant.
fn registration_date(epoch_seconds: i64) -> NaiveDate {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|time| time.date_naive())
        .unwrap_or(NaiveDate::MIN)
}

fn profile_url(handle: &str) -> String {
    format!("https://codeforces.com/profile/{}", handle)
}

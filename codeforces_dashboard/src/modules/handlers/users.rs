use crate::{
    modules::{
        search::{self, PageSelection, UserFilter, DEFAULT_PAGE_SIZE},
        store::Leaderboard,
    },
    types::records::UserRecord,
};
use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use codeforces_dashboard_libs::{
    api::{SearchResultResponse, SearchResultStats},
    ClientError, CodeforcesClient,
};
use http::request::Parts;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::sync::Arc;
use tokio::time::Instant;
use validator::Validate;

#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq, Clone)]
pub struct UserSearchParameter {
    #[validate(range(min = 10, max = 500))]
    pub limit: Option<u32>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    pub filter: Option<UserFilter>,
}

impl UserSearchParameter {
    fn selection(&self) -> PageSelection {
        PageSelection {
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            page: self.page.unwrap_or(1),
        }
    }
}

type UserSearchResponse = SearchResultResponse<UserSearchParameter, UserRecord>;

pub struct ValidatedUserSearchParameter<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedUserSearchParameter<T>
where
    T: DeserializeOwned + Validate + Serialize + Default + Clone,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<SearchResultResponse<T, UserRecord>>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_structuredqs::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(SearchResultResponse::error(
                    T::default(),
                    format!("invalid format query string: [{}]", rejection),
                )),
            )
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(SearchResultResponse::error(
                    value.clone(),
                    format!("Validation error: [{}]", rejection).replace('\n', ", "),
                )),
            )
        })?;

        Ok(ValidatedUserSearchParameter(value))
    }
}

pub async fn search_users(
    ValidatedUserSearchParameter(params): ValidatedUserSearchParameter<UserSearchParameter>,
    Extension(store): Extension<Arc<Leaderboard<CodeforcesClient>>>,
) -> (StatusCode, Json<UserSearchResponse>) {
    let start_process = Instant::now();

    // fail-soft: an upstream failure becomes a banner message and the
    // pipeline runs on an empty enriched set
    let (users, message) = match store.users().await {
        Ok(users) => (users, None),
        Err(e) => {
            tracing::error!("failed to fetch the rated user list: {:?}", e);
            (Arc::new(Vec::new()), Some(fetch_error_message(&e)))
        }
    };

    let filter = params.filter.clone().unwrap_or_default();
    let selection = params.selection();
    let result = search::apply(&users, &filter, &selection);

    let time = Instant::now().duration_since(start_process).as_millis() as u32;
    tracing::info!(
        target: "querylog",
        "elapsed_time={} hits={} params={}",
        time,
        result.total,
        serde_json::to_string(&params).unwrap_or(String::from(""))
    );

    let stats = SearchResultStats {
        time,
        total: result.total,
        index: result.index,
        pages: result.pages,
        count: result.count,
        first: result.first,
        last: result.last,
        params,
    };

    (
        StatusCode::OK,
        Json(UserSearchResponse {
            stats,
            items: result.items,
            message,
        }),
    )
}

#[derive(Debug, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub ranks: Vec<String>,
    pub registered: Option<DateBounds>,
}

#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    pub options: FilterOptions,
    pub message: Option<String>,
}

/// Values for the sidebar controls, derived from the unfiltered enriched
/// set: distinct countries and ranks plus the registration-date bounds.
pub async fn filter_options(
    Extension(store): Extension<Arc<Leaderboard<CodeforcesClient>>>,
) -> (StatusCode, Json<FilterOptionsResponse>) {
    let (users, message) = match store.users().await {
        Ok(users) => (users, None),
        Err(e) => {
            tracing::error!("failed to fetch the rated user list: {:?}", e);
            (Arc::new(Vec::new()), Some(fetch_error_message(&e)))
        }
    };

    let registered = search::registration_bounds(&users).map(|(min, max)| DateBounds { min, max });
    let options = FilterOptions {
        countries: search::country_options(&users),
        ranks: search::rank_options(&users),
        registered,
    };

    (StatusCode::OK, Json(FilterOptionsResponse { options, message }))
}

pub async fn refresh_users(
    Extension(store): Extension<Arc<Leaderboard<CodeforcesClient>>>,
) -> StatusCode {
    store.invalidate().await;
    StatusCode::NO_CONTENT
}

fn fetch_error_message(error: &ClientError) -> String {
    format!("failed to fetch the rated user list: {}", error)
}

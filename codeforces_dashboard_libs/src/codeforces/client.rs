use crate::codeforces::model::{ApiResponse, ApiStatus, RatedUser};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use thiserror::Error;

type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to request to the Codeforces API")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize the response body")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid Codeforces url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("Codeforces API returned FAILED status: {0}")]
    ApiError(String),
}

/// Source of the rated user list. The dashboard consumes this trait so the
/// memoized store can be exercised against stub sources in tests.
#[async_trait]
pub trait RatedListSource {
    async fn rated_list(&self) -> Result<Vec<RatedUser>>;
}

pub struct CodeforcesClient {
    rated_list_url: Url,
    client: Client,
}

impl CodeforcesClient {
    pub fn new(host: &str) -> Result<Self> {
        let mut base_url = Url::parse(host)?;
        base_url.set_path("");
        let rated_list_url = base_url.join("api/user.ratedList")?;

        let client = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(CodeforcesClient {
            rated_list_url,
            client,
        })
    }
}

#[async_trait]
impl RatedListSource for CodeforcesClient {
    /// Retrieves the full rated user list, inactive accounts included.
    async fn rated_list(&self) -> Result<Vec<RatedUser>> {
        tracing::info!("Start to retrieve the rated user list from Codeforces.");

        let res = self
            .client
            .get(self.rated_list_url.clone())
            .query(&[("activeOnly", "false")])
            .send()
            .await?;
        let res = res.error_for_status()?;

        let body = res.text().await?;
        let response: ApiResponse = serde_json::from_str(&body)?;

        match response.status {
            ApiStatus::Ok => {
                let users = response.result.unwrap_or_default();
                tracing::info!("{} rated users successfully retrieved.", users.len());
                Ok(users)
            }
            ApiStatus::Failed => {
                let comment = response
                    .comment
                    .unwrap_or_else(|| String::from("no comment provided"));
                tracing::error!("Codeforces API returned FAILED status: {}", comment);
                Err(ClientError::ApiError(comment))
            }
        }
    }
}

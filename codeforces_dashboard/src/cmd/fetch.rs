use crate::modules::{
    search::{self, PageSelection, UserFilter},
    store::Leaderboard,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use codeforces_dashboard_libs::{api::DateRangeParameter, CodeforcesClient};
use std::env;

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Keep only users from this country (exact match)
    #[arg(long)]
    country: Option<String>,
    /// Keep only users with this rank (exact match)
    #[arg(long)]
    rank: Option<String>,
    /// Earliest registration date to keep (inclusive), e.g. 2020-01-01
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest registration date to keep (inclusive)
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(10..=500))]
    limit: u32,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// One-shot rendition of the dashboard page: fetch, filter, paginate and
/// print the selected page as JSON.
pub async fn run(args: FetchArgs) -> Result<()> {
    let host = env::var("CODEFORCES_HOST").unwrap_or_else(|_| {
        tracing::warn!("CODEFORCES_HOST environment variable is not set. Default value `https://codeforces.com` will be used.");
        String::from("https://codeforces.com")
    });

    let client = CodeforcesClient::new(&host).with_context(|| {
        let message = "couldn't create Codeforces API client. check the value of the CODEFORCES_HOST environment variable.";
        tracing::error!(message);
        format!("{}", message)
    })?;
    let store = Leaderboard::new(client);

    let users = store
        .users()
        .await
        .context("failed to fetch the rated user list")?;

    let registered = DateRangeParameter {
        from: args.from,
        to: args.to,
    };
    let filter = UserFilter {
        country: args.country,
        rank: args.rank,
        registered: (!registered.is_empty()).then_some(registered),
    };
    let selection = PageSelection {
        limit: args.limit,
        page: args.page,
    };

    let result = search::apply(&users, &filter, &selection);
    tracing::info!(
        "Showing users {} to {} of {} total.",
        result.first,
        result.last,
        result.total
    );
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

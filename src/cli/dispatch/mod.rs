use crate::{
    cli::actions::{fetch::Args, Action},
    fanout::Concurrency,
    github::{
        search::{DEFAULT_MIN_FOLLOWERS, DEFAULT_PER_PAGE},
        SearchQuery, DEFAULT_API_URL,
    },
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let token = matches
        .get_one::<String>("token")
        .filter(|token| !token.trim().is_empty())
        .map(|token| SecretString::from(token.trim().to_string()));

    let location = matches
        .get_one::<String>("location")
        .cloned()
        .context("missing required argument: --location")?;

    let min_followers = matches
        .get_one::<u64>("min-followers")
        .copied()
        .unwrap_or(DEFAULT_MIN_FOLLOWERS);

    let per_page = matches
        .get_one::<u32>("per-page")
        .copied()
        .unwrap_or(DEFAULT_PER_PAGE);

    let concurrency = matches
        .get_one::<usize>("concurrency")
        .copied()
        .map_or(Concurrency::Unbounded, Concurrency::from_limit);

    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(10);

    let output_dir = matches
        .get_one::<String>("output-dir")
        .map_or_else(|| PathBuf::from("."), PathBuf::from);

    Ok(Action::Fetch(Args {
        api_url,
        token,
        timeout: Duration::from_secs(timeout),
        query: SearchQuery {
            location,
            min_followers,
        },
        per_page,
        concurrency,
        output_dir,
    }))
}

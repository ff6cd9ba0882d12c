use crate::{
    fanout::{fan_out, successes, Concurrency},
    github::{FetchError, GithubClient, Keyed, RepoRecord, UserDetail},
};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Uppercase, trim, and drop leading `@` markers from a company name.
///
/// `normalize_company(" @acme ") == "ACME"`; applying it twice changes nothing.
#[must_use]
pub fn normalize_company(company: &str) -> String {
    company
        .to_uppercase()
        .trim_start_matches(|c: char| c == '@' || c.is_whitespace())
        .trim_end()
        .to_string()
}

// First occurrence wins so a login never produces two rows.
fn unique_keys<R: Keyed>(records: &[R]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(Keyed::key)
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect()
}

/// Fetch the full profile of every record, one task per login.
///
/// Logins whose fetch fails are left out of the result.
#[instrument(skip(client, records), fields(users = records.len()))]
pub async fn fetch_user_details<R: Keyed>(
    client: &GithubClient,
    records: &[R],
    concurrency: Concurrency,
) -> Vec<UserDetail> {
    let keys = unique_keys(records);
    let requested = keys.len();

    let outcomes = fan_out(keys, concurrency, |login| {
        let client = client.clone();
        async move {
            let mut user = client.user_detail(&login).await?;
            user.company = normalize_company(&user.company);
            Ok::<_, FetchError>(user)
        }
    })
    .await;

    let users = successes(outcomes);

    info!("fetched {} of {} user profiles", users.len(), requested);

    users
}

/// Fetch the repositories of every record, tag each with its owner login, and
/// flatten them into one list.
///
/// Logins whose fetch fails contribute nothing.
#[instrument(skip(client, records), fields(users = records.len()))]
pub async fn fetch_user_repos<R: Keyed>(
    client: &GithubClient,
    records: &[R],
    concurrency: Concurrency,
) -> Vec<RepoRecord> {
    let keys = unique_keys(records);

    let outcomes = fan_out(keys, concurrency, |login| {
        let client = client.clone();
        async move {
            let repos = client.user_repos(&login).await?;
            Ok::<_, FetchError>(
                repos
                    .into_iter()
                    .map(|payload| RepoRecord::from_payload(&login, payload))
                    .collect::<Vec<_>>(),
            )
        }
    })
    .await;

    let repos: Vec<RepoRecord> = successes(outcomes).into_iter().flatten().collect();

    info!("fetched {} repositories", repos.len());

    repos
}

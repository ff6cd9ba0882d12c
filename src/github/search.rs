use super::{FetchError, GithubClient, UserSummary};
use std::fmt;
use tracing::{debug, info, instrument};

pub const DEFAULT_LOCATION: &str = "Shanghai";
pub const DEFAULT_MIN_FOLLOWERS: u64 = 200;
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Search predicate: users in `location` with more than `min_followers` followers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub location: String,
    pub min_followers: u64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            min_followers: DEFAULT_MIN_FOLLOWERS,
        }
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self.location.trim();

        if location.contains(char::is_whitespace) {
            write!(f, "location:\"{location}\"")?;
        } else {
            write!(f, "location:{location}")?;
        }

        write!(f, " followers:>{}", self.min_followers)
    }
}

/// Page through `/search/users` starting at page 1 until a page returns fewer
/// than `per_page` items.
///
/// A page answered with an error status but a JSON body (such as the 422 past
/// the first 1000 results) carries no items and ends the search normally.
///
/// # Errors
/// A transport failure or a non-JSON page aborts the search; results gathered
/// so far are discarded.
#[instrument(skip(client))]
pub async fn search_users(
    client: &GithubClient,
    query: &SearchQuery,
    per_page: u32,
) -> Result<Vec<UserSummary>, FetchError> {
    let q = query.to_string();
    let per_page = per_page.max(1);
    let mut users = Vec::new();
    let mut page = 1;

    loop {
        let items = client.search_users_page(&q, page, per_page).await?;
        let count = items.len();

        debug!("page {} returned {} users", page, count);

        users.extend(items);

        if count < per_page as usize {
            break;
        }

        page += 1;
    }

    info!("search matched {} users over {} pages", users.len(), page);

    Ok(users)
}

use serde::{Deserialize, Deserializer, Serialize};

/// A record that can be fetched further by its login.
pub trait Keyed {
    fn key(&self) -> &str;
}

// GitHub sends `null` for unset profile fields; treat them as the default value.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Response from the Search Users API (`/search/users`).
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<UserSummary>,
}

/// A single user item from the search results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    pub login: String,
    #[serde(default)]
    pub id: u64,
}

impl Keyed for UserSummary {
    fn key(&self) -> &str {
        &self.login
    }
}

/// Full user profile from `/users/{login}`.
///
/// Field order matches the `users.csv` columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserDetail {
    pub login: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub company: String,
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub hireable: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub bio: String,
    #[serde(default, deserialize_with = "nullable")]
    pub public_repos: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub followers: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub following: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
}

impl Keyed for UserDetail {
    fn key(&self) -> &str {
        &self.login
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct License {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

/// Repository object from `/users/{login}/repos`. Carries no owner login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoPayload {
    #[serde(default, deserialize_with = "nullable")]
    pub full_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub stargazers_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub watchers_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub language: String,
    #[serde(default, deserialize_with = "nullable")]
    pub has_projects: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub has_wiki: bool,
    #[serde(default)]
    pub license: Option<License>,
}

/// A repository tagged with the login it was fetched for.
///
/// Field order matches the `repositories.csv` columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoRecord {
    pub login: String,
    pub full_name: String,
    pub created_at: String,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub language: String,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub license_name: String,
}

impl RepoRecord {
    #[must_use]
    pub fn from_payload(owner: &str, payload: RepoPayload) -> Self {
        Self {
            login: owner.to_string(),
            full_name: payload.full_name,
            created_at: payload.created_at,
            stargazers_count: payload.stargazers_count,
            watchers_count: payload.watchers_count,
            language: payload.language,
            has_projects: payload.has_projects,
            has_wiki: payload.has_wiki,
            license_name: payload.license.map(|l| l.name).unwrap_or_default(),
        }
    }
}

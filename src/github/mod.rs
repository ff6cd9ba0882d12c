pub mod error;
pub mod models;
pub mod search;

pub use self::error::FetchError;
pub use self::models::{Keyed, RepoPayload, RepoRecord, UserDetail, UserSummary};
pub use self::search::{search_users, SearchQuery};

use crate::APP_USER_AGENT;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Response,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// The API caps `per_page` at 100, so repository lists longer than that are truncated.
const REPOS_PER_PAGE: u32 = 500;

/// Thin GitHub REST client shared by every fetch task.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct GithubClient {
    base_url: Url,
    http: Client,
}

impl GithubClient {
    /// Build a client for `base_url`, sending `Authorization: Bearer <token>`
    /// on every request when a token is given.
    ///
    /// # Errors
    /// Returns an error if the base URL is not an http(s) URL, the token is not
    /// a valid header value, or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        token: Option<&SecretString>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(FetchError::BaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        if let Some(token) = token {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { base_url, http })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn send(&self, url: &Url) -> Result<Response, FetchError> {
        debug!("GET {}", url);

        Ok(self.http.get(url.clone()).send().await?)
    }

    async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, FetchError> {
        response
            .json::<T>()
            .await
            .map_err(|source| FetchError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.send(&url).await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Self::decode(&url, response).await
    }

    /// Fetch one page of `/search/users`.
    ///
    /// The body is decoded whatever the status. An error body such as the 422
    /// returned past the first 1000 results has no `items`, so it reads as an
    /// empty page and ends the search.
    ///
    /// # Errors
    /// Returns an error on transport failure or a body that is not JSON.
    #[instrument(skip(self))]
    pub async fn search_users_page(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<UserSummary>, FetchError> {
        let mut url = self.endpoint(&["search", "users"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let response = self.send(&url).await?;
        let status = response.status();

        if !status.is_success() {
            warn!("search page {} returned {}, treating it as empty", page, status);
        }

        let body: models::SearchResponse = Self::decode(&url, response).await?;

        Ok(body.items)
    }

    /// Fetch the full profile for `login`.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-2xx status, or a malformed body.
    #[instrument(skip(self))]
    pub async fn user_detail(&self, login: &str) -> Result<UserDetail, FetchError> {
        let url = self.endpoint(&["users", login])?;

        self.get_json(url).await
    }

    /// Fetch the repositories owned by `login` (single request, no pagination).
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-2xx status, or a malformed body.
    #[instrument(skip(self))]
    pub async fn user_repos(&self, login: &str) -> Result<Vec<RepoPayload>, FetchError> {
        let mut url = self.endpoint(&["users", login, "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &REPOS_PER_PAGE.to_string());

        self.get_json(url).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn rejects_non_http_base_url() {
        let result = GithubClient::new("ftp://example.com", None, REQUEST_TIMEOUT);
        assert!(matches!(result, Err(FetchError::BaseUrl(_))));
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client =
            GithubClient::new("https://ghe.example.com/api/v3/", None, REQUEST_TIMEOUT).unwrap();
        let url = client.endpoint(&["users", "octocat", "repos"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/users/octocat/repos"
        );
    }

    #[test]
    fn endpoint_escapes_login() {
        let client = GithubClient::new(DEFAULT_API_URL, None, REQUEST_TIMEOUT).unwrap();
        let url = client.endpoint(&["users", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/a%2Fb");
    }

    #[tokio::test]
    async fn user_detail_sends_bearer_token() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(header("Accept", "application/vnd.github.v3+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "octocat",
                "company": "@github",
                "followers": 10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = SecretString::from("secret-token".to_string());
        let client = GithubClient::new(&server.uri(), Some(&token), REQUEST_TIMEOUT)?;
        let user = client.user_detail("octocat").await?;

        assert_eq!(user.login, "octocat");
        assert_eq!(user.company, "@github");
        assert_eq!(user.followers, 10);
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri(), None, REQUEST_TIMEOUT)?;
        let result = client.user_detail("ghost").await;

        assert!(matches!(
            result,
            Err(FetchError::Status { status, .. }) if status == reqwest::StatusCode::NOT_FOUND
        ));
        Ok(())
    }

    #[tokio::test]
    async fn search_page_reads_error_body_as_empty() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/users"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "API rate limit exceeded"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri(), None, REQUEST_TIMEOUT)?;
        let items = client.search_users_page("location:Shanghai", 1, 100).await?;

        assert!(items.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/broken/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri(), None, REQUEST_TIMEOUT)?;
        let result = client.user_repos("broken").await;

        assert!(matches!(result, Err(FetchError::Decode { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn user_repos_requests_500_per_page() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .and(query_param("per_page", "500"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"full_name": "octocat/a"},
                {"full_name": "octocat/b"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri(), None, REQUEST_TIMEOUT)?;
        let repos = client.user_repos("octocat").await?;

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[1].full_name, "octocat/b");
        Ok(())
    }
}

use crate::github::{FetchError, GithubClient, DEFAULT_API_URL, REQUEST_TIMEOUT};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Connection settings shared by every request of a run.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub token: SecretString,
    pub timeout: Duration,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL.to_string())
    }
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            token: SecretString::default(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.token = token;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Build the API client. An empty token means unauthenticated requests.
    ///
    /// # Errors
    /// Returns an error if the API URL or token is unusable.
    pub fn client(&self) -> Result<GithubClient, FetchError> {
        let token = if self.token.expose_secret().is_empty() {
            None
        } else {
            Some(&self.token)
        };

        GithubClient::new(&self.api_url, token, self.timeout)
    }
}

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the GitHub API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{url} - {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("unsupported API base URL: {0}")]
    BaseUrl(String),
    #[error("invalid authorization token: {0}")]
    Token(#[from] reqwest::header::InvalidHeaderValue),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

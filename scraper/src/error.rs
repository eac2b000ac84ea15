use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scraping the shortlist.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Credentials file {path} not found; run `shortlist init` to create it")]
    CredentialsMissing { path: PathBuf },

    #[error("Credentials file {path} is malformed: {source}")]
    CredentialsMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot access credentials file {path}: {source}")]
    CredentialsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credentials file {path} has no {field}; fill it in before scraping")]
    CredentialsIncomplete { path: PathBuf, field: &'static str },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("No login form found at {0}")]
    LoginFormNotFound(String),

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Single sign-on still handing off after {hops} forms")]
    SsoHandoffLoop { hops: usize },

    #[error("No Shortlist quick search on {0}")]
    ShortlistNotFound(String),

    #[error("Malformed posting: {0}")]
    MalformedPosting(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

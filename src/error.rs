//! Error types shared by every request kind.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Input validation failed; raised before any network call.
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("an API key is required to use the {0} geocoder")]
    MissingApiKey(&'static str),

    #[error("one of address, state or zip must be provided")]
    MissingLocation,

    #[error("invalid alias `{alias}` for api `{api}` and year {year}")]
    InvalidAlias {
        alias: String,
        api: String,
        year: u16,
    },

    #[error("no coordinates found for {0}")]
    LocationNotFound(String),

    /// The upstream answered, but not in the envelope we know how to read.
    #[error("unexpected response from {service}: {detail}")]
    UnexpectedResponse {
        service: &'static str,
        detail: String,
    },

    #[error("{service} returned status {status}")]
    UpstreamStatus {
        service: &'static str,
        status: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed JSONP payload: {0}")]
    Jsonp(String),

    #[error("geometry conversion failed: {0}")]
    Geometry(String),
}

impl Error {
    pub(crate) fn unexpected(service: &'static str, detail: impl Into<String>) -> Self {
        Error::UnexpectedResponse {
            service,
            detail: detail.into(),
        }
    }

    /// True for errors raised while validating input, before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingField(_)
                | Error::MissingApiKey(_)
                | Error::MissingLocation
                | Error::InvalidAlias { .. }
        )
    }
}

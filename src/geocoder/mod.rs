//! Upstream geocoding services: URL construction and response normalization.
//!
//! Every backend is a pair of pure functions (build the URL, read the envelope)
//! so the whole module can be tested without a network.

pub mod forward;
pub mod reverse;
pub mod zcta;

pub use forward::ForwardBackend;
pub use reverse::ReverseBackend;

use serde::{Deserialize, Deserializer};
use url::form_urlencoded;

/// Form-encode a free-text query value
pub(crate) fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Join a base URL and a relative path with exactly one slash between them
pub(crate) fn join_path(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Upstreams disagree on whether coordinates are JSON numbers or strings
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("https://a/b/", "/c"), "https://a/b/c");
        assert_eq!(join_path("https://a/b", "c"), "https://a/b/c");
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("1600 Pennsylvania Ave"), "1600+Pennsylvania+Ave");
        assert_eq!(encode("Washington, DC"), "Washington%2C+DC");
    }
}

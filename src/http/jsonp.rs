use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};

fn jsonp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // callback name, optional, then the JSON payload inside the outermost parens
    RE.get_or_init(|| Regex::new(r"(?s)^\s*[\w$.\[\]]*\s*\((.*)\)\s*;?\s*$").unwrap())
}

/// Strip a JSONP wrapper (`callback({...});`) and return the JSON text inside.
///
/// A body that is already plain JSON is returned unchanged.
pub fn unwrap_jsonp(body: &str) -> Result<&str> {
    let trimmed = body.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed);
    }

    jsonp_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            let preview: String = trimmed.chars().take(40).collect();
            Error::Jsonp(preview)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_named_callback() {
        let body = r#"jQuery123_456({"result": {"addressMatches": []}});"#;
        assert_eq!(unwrap_jsonp(body).unwrap(), r#"{"result": {"addressMatches": []}}"#);
    }

    #[test]
    fn test_unwrap_anonymous_callback() {
        // The Census geocoder wraps with "undefined(...)" when no callback is named
        let body = "undefined({\"a\": 1})\n";
        assert_eq!(unwrap_jsonp(body).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_plain_json_passes_through() {
        assert_eq!(unwrap_jsonp("  [1, 2] ").unwrap(), "[1, 2]");
    }

    #[test]
    fn test_payload_with_parens_inside() {
        let body = r#"cb({"name": "Washington (city)"})"#;
        assert_eq!(unwrap_jsonp(body).unwrap(), r#"{"name": "Washington (city)"}"#);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(unwrap_jsonp("<html>oops</html>"), Err(Error::Jsonp(_))));
    }
}

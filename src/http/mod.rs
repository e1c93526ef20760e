//! HTTP collaborator: one GET, parsed as JSON or JSONP.

mod client;
mod jsonp;

pub use client::{HttpClient, ReqwestClient};
pub use jsonp::unwrap_jsonp;

#[cfg(test)]
pub use client::MockHttpClient;

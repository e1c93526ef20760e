//! Static lookup data: variable aliases and state capital coordinates.
//!
//! Both tables are loaded once and only read afterwards, so they can be shared
//! freely between concurrent requests.

mod aliases;
mod capitals;

pub use aliases::{AliasDictionary, AliasEntry};
pub use capitals::StateCapitals;

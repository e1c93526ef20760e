//! Human-friendly names for Census API variables.

use hashbrown::{HashMap, HashSet};
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::info;

use crate::error::{Error, Result};

const BUNDLED_ALIASES: &str = include_str!("../../data/aliases.json");

/// One alias: the canonical variable it stands for and where it is valid
#[derive(Debug, Clone, Deserialize)]
pub struct AliasEntry {
    #[serde(default)]
    pub description: Option<String>,
    /// Canonical Census variable name, e.g. `B01003_001E`
    pub variable: String,
    /// API name → years the variable is published for
    #[serde(default)]
    pub api: HashMap<String, HashSet<u16>>,
    #[serde(default)]
    pub normalizable: bool,
}

impl AliasEntry {
    pub fn is_valid_for(&self, api: &str, year: u16) -> bool {
        self.api
            .get(api)
            .map(|years| years.contains(&year))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AliasDictionary {
    entries: HashMap<String, AliasEntry>,
}

impl AliasDictionary {
    /// Parse a dictionary from its JSON form: `{ alias: { variable, api, normalizable } }`
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, AliasEntry> = serde_json::from_str(json)?;
        info!("Loaded {} variable aliases", entries.len());
        Ok(Self { entries })
    }

    /// The dictionary shipped with the crate
    pub fn bundled() -> &'static AliasDictionary {
        static BUNDLED: OnceLock<AliasDictionary> = OnceLock::new();
        BUNDLED.get_or_init(|| {
            AliasDictionary::from_json(BUNDLED_ALIASES).expect("bundled aliases.json is valid")
        })
    }

    pub fn get(&self, alias: &str) -> Option<&AliasEntry> {
        self.entries.get(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &AliasEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Canonical variable for a known alias; anything else passes through untouched.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries
            .get(name)
            .map(|entry| entry.variable.as_str())
            .unwrap_or(name)
    }

    /// Like [`resolve`](Self::resolve), but a known alias must also be published
    /// for the given api and year.
    pub fn resolve_validated(&self, name: &str, api: &str, year: u16) -> Result<String> {
        match self.entries.get(name) {
            Some(entry) if entry.is_valid_for(api, year) => Ok(entry.variable.clone()),
            Some(_) => Err(Error::InvalidAlias {
                alias: name.to_string(),
                api: api.to_string(),
                year,
            }),
            None => Ok(name.to_string()),
        }
    }

    pub fn is_normalizable(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .map(|entry| entry.normalizable)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "population": {
            "variable": "B01003_001E",
            "api": { "acs5": [2014, 2015], "acs1": [2015] },
            "normalizable": false
        },
        "poverty": {
            "description": "Population below the poverty level",
            "variable": "B17001_002E",
            "api": { "acs5": [2015] },
            "normalizable": true
        }
    }"#;

    #[test]
    fn test_resolve_known_and_unknown() {
        let dict = AliasDictionary::from_json(SAMPLE).unwrap();
        assert_eq!(dict.resolve("population"), "B01003_001E");
        assert_eq!(dict.resolve("B19013_001E"), "B19013_001E");
        assert_eq!(dict.resolve("NAME"), "NAME");
    }

    #[test]
    fn test_resolve_validated() {
        let dict = AliasDictionary::from_json(SAMPLE).unwrap();
        assert_eq!(
            dict.resolve_validated("population", "acs5", 2014).unwrap(),
            "B01003_001E"
        );
        assert!(matches!(
            dict.resolve_validated("population", "acs1", 2014),
            Err(Error::InvalidAlias { .. })
        ));
        assert!(matches!(
            dict.resolve_validated("poverty", "sf1", 2015),
            Err(Error::InvalidAlias { .. })
        ));
        // unknown names are not validated
        assert_eq!(
            dict.resolve_validated("B00001_001E", "sf1", 1990).unwrap(),
            "B00001_001E"
        );
    }

    #[test]
    fn test_is_normalizable() {
        let dict = AliasDictionary::from_json(SAMPLE).unwrap();
        assert!(dict.is_normalizable("poverty"));
        assert!(!dict.is_normalizable("population"));
        assert!(!dict.is_normalizable("B17001_002E"));
    }

    #[test]
    fn test_bundled_dictionary_parses() {
        let dict = AliasDictionary::bundled();
        assert!(!dict.is_empty());
        for (alias, entry) in dict.aliases() {
            assert_eq!(dict.resolve(alias), entry.variable);
            assert!(!entry.api.is_empty(), "{} has no valid api/year", alias);
        }
    }
}

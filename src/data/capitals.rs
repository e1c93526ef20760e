//! State capital coordinates, used to place a request that only names a state.

use hashbrown::HashMap;
use std::sync::OnceLock;

use crate::error::Result;
use crate::models::Coordinates;

const BUNDLED_CAPITALS: &str = include_str!("../../data/state_capitals.json");

#[derive(Debug, Clone, Default)]
pub struct StateCapitals {
    /// Upper-case state code → coordinates
    capitals: HashMap<String, Coordinates>,
}

impl StateCapitals {
    /// Parse `{ "CA": [lat, lng], ... }`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, [f64; 2]> = serde_json::from_str(json)?;
        let capitals = raw
            .into_iter()
            .map(|(code, [lat, lng])| (code.to_uppercase(), Coordinates::new(lat, lng)))
            .collect();
        Ok(Self { capitals })
    }

    pub fn bundled() -> &'static StateCapitals {
        static BUNDLED: OnceLock<StateCapitals> = OnceLock::new();
        BUNDLED.get_or_init(|| {
            StateCapitals::from_json(BUNDLED_CAPITALS).expect("bundled state_capitals.json is valid")
        })
    }

    /// Case-insensitive lookup by two-letter code
    pub fn lookup(&self, state_code: &str) -> Option<Coordinates> {
        self.capitals
            .get(&state_code.trim().to_uppercase())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.capitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capitals.is_empty()
    }
}

//! Selected governorate, mirrored into the page's query string.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::reference::Governorate;

/// Query-string key carrying the selection.
pub const GOV_KEY: &str = "gov";

/// The addressable part of page state: the query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UrlState {
    params: BTreeMap<String, String>,
}

impl UrlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(&self.params)
    }
}

impl From<HashMap<String, String>> for UrlState {
    fn from(params: HashMap<String, String>) -> Self {
        Self {
            params: params.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UrlState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Resolves the active governorate from `url_state`.
///
/// A present but unknown value falls back to the default and is left in
/// place. Only a missing key causes the default to be written back.
pub fn resolve_selection(url_state: &mut UrlState) -> Governorate {
    match url_state.get(GOV_KEY) {
        Some(raw) => match raw.parse::<Governorate>() {
            Ok(governorate) => governorate,
            Err(err) => {
                debug!(%err, "falling back to {}", Governorate::DEFAULT);
                Governorate::DEFAULT
            }
        },
        None => {
            url_state.set(GOV_KEY, Governorate::DEFAULT.name());
            Governorate::DEFAULT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_round_trips_through_encoding() {
        let state: UrlState = [(GOV_KEY, "Ma’an")].into_iter().collect();
        let query = state.to_query_string().unwrap();
        assert_eq!(query, "gov=Ma%E2%80%99an");
        let decoded: HashMap<String, String> = serde_urlencoded::from_str(&query).unwrap();
        assert_eq!(UrlState::from(decoded), state);
    }

    #[test]
    fn other_params_survive_write_back() {
        let mut state: UrlState = [("theme", "dark")].into_iter().collect();
        assert_eq!(resolve_selection(&mut state), Governorate::Amman);
        assert_eq!(state.get("theme"), Some("dark"));
        assert_eq!(state.get(GOV_KEY), Some("Amman"));
        assert_eq!(state.to_query_string().unwrap(), "gov=Amman&theme=dark");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let state: UrlState = [(GOV_KEY, "a&b=c d")].into_iter().collect();
        assert_eq!(state.to_query_string().unwrap(), "gov=a%26b%3Dc+d");
    }
}

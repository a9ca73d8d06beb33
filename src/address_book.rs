use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

/// Curated aliases preferred over the naive text-before-comma alias, in priority order.
pub const KNOWN_PLACES: [&str; 5] = [
    "Interchurch",
    "Ripley Grier",
    "St Luke",
    "Quantedge",
    "Holy Apostle",
];

/// Short location alias to full address, kept sorted by alias for the glossary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AddressBook {
    entries: BTreeMap<String, String>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn glossary(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(alias, address)| (alias.as_str(), address.as_str()))
    }

    /// Derive the alias for `location`, recording its full address so a glossary can be
    /// shown later. Locations without a comma are returned unchanged and not recorded.
    pub fn shorten_location(&mut self, location: &str) -> String {
        let Some((candidate, rest)) = location.split_once(',') else {
            return location.to_string();
        };
        let address = rest.trim_start();
        let alias = KNOWN_PLACES
            .iter()
            .copied()
            .find(|place| candidate.contains(*place))
            .unwrap_or(candidate);
        self.enrich(alias, address);
        alias.to_string()
    }

    fn enrich(&mut self, alias: &str, address: &str) {
        if let Some(existing) = self.entries.get(alias) {
            if existing != address {
                warn!("replacing address book entry for '{alias}': '{existing}' -> '{address}'");
            }
        }
        self.entries.insert(alias.to_string(), address.to_string());
    }
}

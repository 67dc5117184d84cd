#![allow(dead_code)]

use comboforge::catalog::Catalog;
use serde_json::{json, Map, Value};

/// Builder for catalog JSON to keep test fixtures short.
///
/// Characters get the same name in every language unless added through
/// [`CatalogBuilder::localized_card`].
#[derive(Default)]
pub struct CatalogBuilder {
    cards: Map<String, Value>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card(self, id: &str, chars: &[&str]) -> Self {
        self.typed_card(id, "Attack", chars)
    }

    pub fn typed_card(self, id: &str, kind: &str, chars: &[&str]) -> Self {
        let pairs: Vec<(&str, &str)> = chars.iter().map(|c| (*c, *c)).collect();
        self.localized_card(id, (kind, kind), &pairs)
    }

    /// `chars` are (EN, DE) name pairs.
    pub fn localized_card(mut self, id: &str, kind: (&str, &str), chars: &[(&str, &str)]) -> Self {
        let characters: Vec<Value> = chars
            .iter()
            .map(|(en, de)| json!({ "EN": en, "DE": de }))
            .collect();
        self.cards.insert(
            id.to_string(),
            json!({
                "name": { "EN": format!("{} (EN)", id), "DE": format!("{} (DE)", id) },
                "type": { "EN": kind.0, "DE": kind.1 },
                "characters": characters,
            }),
        );
        self
    }

    pub fn raw(mut self, id: &str, value: Value) -> Self {
        self.cards.insert(id.to_string(), value);
        self
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.cards.clone()).to_string()
    }

    pub fn build(self) -> Catalog {
        Catalog::from_json(&self.to_json()).expect("fixture catalog must parse")
    }
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn sorted(mut list: Vec<String>) -> Vec<String> {
    list.sort();
    list
}

use crate::error::{ComboError, ComboResult};
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Dense per-language character handle. Only meaningful together with the
/// [`LanguageView`] it came from.
pub type CharId = u32;

/// A string available in every supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized(BTreeMap<Language, String>);

impl Localized {
    fn from_raw(raw: &BTreeMap<String, String>, field: &str, card: &str) -> ComboResult<Self> {
        let mut values = BTreeMap::new();
        for lang in Language::iter() {
            let value = raw
                .get(lang.tag())
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ComboError::DataIntegrity {
                    card: card.to_string(),
                    reason: format!("'{}' has no {} entry", field, lang.tag()),
                })?;
            values.insert(lang, value.to_string());
        }
        Ok(Self(values))
    }

    pub fn get(&self, language: Language) -> &str {
        self.0.get(&language).map(String::as_str).unwrap_or_default()
    }
}

/// A selectable roster entry. Identity is the canonical (DE) name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    names: Localized,
}

impl Character {
    pub fn name(&self, language: Language) -> &str {
        self.names.get(language)
    }

    pub fn canonical(&self) -> &str {
        self.names.get(Language::CANONICAL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub name: Localized,
    pub kind: Localized,
    pub characters: Vec<Character>,
    #[serde(skip)]
    pub(crate) index: usize,
}

impl Card {
    /// Required character names in `language`.
    pub fn required(&self, language: Language) -> impl Iterator<Item = &str> + '_ {
        self.characters.iter().map(move |c| c.name(language))
    }

    /// Position of the card in catalog iteration order.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Deserialize)]
struct RawCard {
    name: Option<BTreeMap<String, String>>,
    #[serde(rename = "type")]
    kind: Option<BTreeMap<String, String>>,
    characters: Option<Vec<BTreeMap<String, String>>>,
}

impl RawCard {
    fn resolve(self, id: &str) -> ComboResult<(Localized, Localized, Vec<Character>)> {
        let missing = |field: &str| ComboError::DataIntegrity {
            card: id.to_string(),
            reason: format!("missing '{}'", field),
        };

        let name = Localized::from_raw(&self.name.ok_or_else(|| missing("name"))?, "name", id)?;
        let kind = Localized::from_raw(&self.kind.ok_or_else(|| missing("type"))?, "type", id)?;
        let raw_chars = self.characters.ok_or_else(|| missing("characters"))?;

        if raw_chars.is_empty() {
            return Err(ComboError::DataIntegrity {
                card: id.to_string(),
                reason: "requires no characters".to_string(),
            });
        }

        let characters = raw_chars
            .iter()
            .map(|c| Localized::from_raw(c, "characters", id).map(|names| Character { names }))
            .collect::<ComboResult<Vec<_>>>()?;

        Ok((name, kind, characters))
    }
}

/// A card entry rejected while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCard {
    pub id: String,
    pub reason: String,
}

/// Character names of one language interned to dense ids, with every card's
/// requirement pre-resolved against them.
#[derive(Debug, Clone, Default)]
pub struct LanguageView {
    names: Vec<String>,
    ids: HashMap<String, CharId>,
    requirements: Vec<Vec<CharId>>,
}

impl LanguageView {
    fn build(cards: &[Card], language: Language) -> Self {
        let mut view = LanguageView::default();
        for card in cards {
            let mut req: Vec<CharId> = card.required(language).map(|n| view.intern(n)).collect();
            req.sort_unstable();
            req.dedup();
            view.requirements.push(req);
        }
        view
    }

    fn intern(&mut self, name: &str) -> CharId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as CharId;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<CharId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: CharId) -> &str {
        &self.names[id as usize]
    }

    /// Every character name, in order of first appearance across the catalog.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Sorted, deduplicated character ids the card at `index` requires.
    pub fn requirement(&self, index: usize) -> &[CharId] {
        &self.requirements[index]
    }
}

/// The read-only card collection shared for a whole session.
#[derive(Debug, Clone)]
pub struct Catalog {
    cards: Vec<Card>,
    views: BTreeMap<Language, LanguageView>,
    skipped: Vec<SkippedCard>,
}

impl Catalog {
    /// Loads a catalog, skipping malformed cards with a warning.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ComboResult<Self> {
        let path = path.as_ref();
        info!("📂 Loading catalog: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> ComboResult<Self> {
        Self::parse(json, false)
    }

    /// Like [`Catalog::from_json`], but the first malformed card fails the load.
    pub fn from_json_strict(json: &str) -> ComboResult<Self> {
        Self::parse(json, true)
    }

    fn parse(json: &str, strict: bool) -> ComboResult<Self> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut cards = Vec::with_capacity(raw.len());
        let mut skipped = Vec::new();

        for (id, value) in raw {
            let resolved = serde_json::from_value::<RawCard>(value)
                .map_err(|e| ComboError::DataIntegrity {
                    card: id.clone(),
                    reason: e.to_string(),
                })
                .and_then(|raw_card| raw_card.resolve(&id));

            match resolved {
                Ok((name, kind, characters)) => {
                    let index = cards.len();
                    cards.push(Card {
                        id,
                        name,
                        kind,
                        characters,
                        index,
                    });
                }
                Err(e) if strict => return Err(e),
                Err(e) => {
                    warn!("⚠️  Skipping card: {}", e);
                    let reason = match e {
                        ComboError::DataIntegrity { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    skipped.push(SkippedCard { id, reason });
                }
            }
        }

        Ok(Self::from_cards(cards, skipped))
    }

    fn from_cards(cards: Vec<Card>, skipped: Vec<SkippedCard>) -> Self {
        let views: BTreeMap<Language, LanguageView> = Language::iter()
            .map(|lang| (lang, LanguageView::build(&cards, lang)))
            .collect();

        debug!(
            "Catalog Stats: {} cards, {} characters, {} skipped",
            cards.len(),
            views.get(&Language::CANONICAL).map_or(0, LanguageView::len),
            skipped.len()
        );

        Self {
            cards,
            views,
            skipped,
        }
    }

    pub fn empty() -> Self {
        Self::from_cards(Vec::new(), Vec::new())
    }

    /// Cards in iteration order (ascending id).
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards
            .binary_search_by(|c| c.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.cards[i])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedCard] {
        &self.skipped
    }

    pub fn view(&self, language: Language) -> &LanguageView {
        // Built for every language in `from_cards`.
        &self.views[&language]
    }

    /// The roster in `language`: every character any card requires.
    pub fn characters(&self, language: Language) -> &[String] {
        self.view(language).names()
    }

    /// Translates a character name from one language to another. Names the
    /// catalog does not know are returned unchanged.
    pub fn translate<'a>(&'a self, name: &'a str, from: Language, to: Language) -> &'a str {
        self.cards
            .iter()
            .flat_map(|card| card.characters.iter())
            .find(|c| c.name(from) == name)
            .map_or(name, |c| c.name(to))
    }

    /// The canonical (DE) identity of a character named in `from`. Unknown
    /// names are returned unchanged.
    pub fn canonical<'a>(&'a self, name: &'a str, from: Language) -> &'a str {
        self.cards
            .iter()
            .flat_map(|card| card.characters.iter())
            .find(|c| c.name(from) == name)
            .map_or(name, Character::canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Zeta": {
            "name": {"EN": "Zeta Buff", "DE": "Zeta Bonus"},
            "type": {"EN": "Attack", "DE": "Angriff"},
            "characters": [{"EN": "Wolf", "DE": "Wolf"}, {"EN": "Bear", "DE": "Baer"}]
        },
        "Alpha": {
            "name": {"EN": "Alpha Buff", "DE": "Alpha Bonus"},
            "type": {"EN": "Defense", "DE": "Verteidigung"},
            "characters": [{"EN": "Bear", "DE": "Baer"}, {"EN": "Owl", "DE": "Eule"}]
        }
    }"#;

    #[test]
    fn cards_iterate_in_id_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let ids: Vec<&str> = catalog.cards().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["Alpha", "Zeta"]);
        assert_eq!(catalog.get("Zeta").unwrap().index(), 1);
    }

    #[test]
    fn roster_follows_first_appearance() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.characters(Language::En), &["Bear", "Owl", "Wolf"]);
        assert_eq!(catalog.characters(Language::De), &["Baer", "Eule", "Wolf"]);
    }

    #[test]
    fn requirements_are_resolved_per_language() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let view = catalog.view(Language::De);
        let zeta = catalog.get("Zeta").unwrap();
        let names: Vec<&str> = view
            .requirement(zeta.index())
            .iter()
            .map(|&id| view.name(id))
            .collect();
        assert_eq!(names, vec!["Baer", "Wolf"]);
    }

    #[test]
    fn translate_maps_between_languages() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.translate("Owl", Language::En, Language::De), "Eule");
        assert_eq!(catalog.translate("Ghost", Language::En, Language::De), "Ghost");
    }

    #[test]
    fn canonical_is_the_german_name() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.canonical("Bear", Language::En), "Baer");
        assert_eq!(catalog.canonical("Baer", Language::De), "Baer");
        assert_eq!(catalog.canonical("Ghost", Language::En), "Ghost");
    }
}

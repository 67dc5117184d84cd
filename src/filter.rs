use crate::catalog::{Card, Catalog};
use crate::language::Language;
use std::collections::BTreeSet;
use std::fmt;
use strum::IntoEnumIterator;

/// Restricts which cards an autofill tries to activate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    Any,
    Type(String),
}

impl TypeFilter {
    /// Blank input and the "random" label of any language mean no restriction.
    pub fn parse(input: &str) -> Self {
        let value = input.trim();
        let is_any = value.is_empty()
            || Language::iter().any(|lang| value.to_lowercase() == lang.any_type_label());
        if is_any {
            Self::Any
        } else {
            Self::Type(value.to_string())
        }
    }

    pub fn matches(&self, card: &Card, language: Language) -> bool {
        match self {
            Self::Any => true,
            Self::Type(t) => card.kind.get(language).to_lowercase() == t.to_lowercase(),
        }
    }

    pub fn apply<'a>(&self, catalog: &'a Catalog, language: Language) -> Vec<&'a Card> {
        catalog
            .cards()
            .iter()
            .filter(|card| self.matches(card, language))
            .collect()
    }

    /// The choices a filter menu offers: the "random" label, then every card
    /// type in `language`, sorted.
    pub fn options(catalog: &Catalog, language: Language) -> Vec<String> {
        let types: BTreeSet<&str> = catalog.cards().iter().map(|c| c.kind.get(language)).collect();
        std::iter::once(language.any_type_label().to_string())
            .chain(types.into_iter().map(str::to_string))
            .collect()
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Type(t) => write!(f, "{}", t),
        }
    }
}

use crate::catalog::{Card, Catalog, CharId, LanguageView};
use crate::language::Language;

/// Membership flags over the characters of one [`LanguageView`].
#[derive(Debug, Clone)]
pub(crate) struct Presence {
    flags: Vec<bool>,
}

impl Presence {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Marks every name the view knows; unknown names cannot satisfy anything.
    pub(crate) fn from_names<S: AsRef<str>>(view: &LanguageView, names: &[S]) -> Self {
        let mut presence = Self::new(view.len());
        for id in names.iter().filter_map(|n| view.id(n.as_ref())) {
            presence.set(id, true);
        }
        presence
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, id: CharId, value: bool) {
        self.flags[id as usize] = value;
    }

    #[inline(always)]
    pub(crate) fn contains(&self, id: CharId) -> bool {
        self.flags[id as usize]
    }

    #[inline(always)]
    pub(crate) fn satisfies(&self, requirement: &[CharId]) -> bool {
        requirement.iter().all(|&id| self.contains(id))
    }
}

/// Returns every card whose required characters are all in `selected`, in
/// catalog order.
pub fn activated_cards<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    selected: &[S],
    language: Language,
) -> Vec<&'a Card> {
    let view = catalog.view(language);
    let presence = Presence::from_names(view, selected);

    catalog
        .cards()
        .iter()
        .filter(|card| presence.satisfies(view.requirement(card.index())))
        .collect()
}

pub fn activation_count<S: AsRef<str>>(catalog: &Catalog, selected: &[S], language: Language) -> usize {
    activated_cards(catalog, selected, language).len()
}

/// Single-card check straight from the card's localized requirement.
pub fn is_activated<S: AsRef<str>>(card: &Card, selected: &[S], language: Language) -> bool {
    card.required(language)
        .all(|name| selected.iter().any(|s| s.as_ref() == name))
}

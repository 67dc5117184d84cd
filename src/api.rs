use crate::catalog::{Card, Catalog};
use crate::error::{ComboError, ComboResult};
use crate::evaluator;
use crate::filter::TypeFilter;
use crate::language::Language;
use crate::profile::Profile;
use crate::search::{ProgressCallback, Search, SearchOptions, SearchOutcome};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

pub const MAX_SELECTION: usize = 6;

/// The user's picked characters, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    characters: Vec<String>,
}

impl Selection {
    /// Keeps the first `MAX_SELECTION` distinct names.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut selection = Self::default();
        for name in names {
            selection.insert(name.as_ref());
        }
        selection
    }

    pub fn contains(&self, name: &str) -> bool {
        self.characters.iter().any(|c| c == name)
    }

    /// Returns `false` if the name is already present or the selection is full.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) || self.is_full() {
            return false;
        }
        self.characters.push(name.to_string());
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.characters.len();
        self.characters.retain(|c| c != name);
        self.characters.len() != before
    }

    pub fn is_full(&self) -> bool {
        self.characters.len() >= MAX_SELECTION
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.characters
    }
}

/// What an autofill did to the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutofillReport {
    pub filter: String,
    pub outcome: SearchOutcome,
    pub added: Vec<String>,
    pub selection: Vec<String>,
    pub activated: Vec<String>,
}

/// Selection state plus the profile, over a shared read-only catalog.
pub struct ComboSession {
    catalog: Arc<Catalog>,
    profile: Profile,
    profile_path: Option<PathBuf>,
    transient_excluded: BTreeSet<String>,
    selection: Selection,
    options: SearchOptions,
}

impl ComboSession {
    pub fn new(catalog: Arc<Catalog>, profile: Profile) -> Self {
        Self {
            catalog,
            profile,
            profile_path: None,
            transient_excluded: BTreeSet::new(),
            selection: Selection::default(),
            options: SearchOptions::default(),
        }
    }

    /// Profile changes are written back to `path` as they happen.
    pub fn with_profile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profile_path = Some(path.into());
        self
    }

    /// `max_slots` is capped at [`MAX_SELECTION`].
    pub fn with_options(mut self, mut options: SearchOptions) -> Self {
        if options.max_slots > MAX_SELECTION {
            warn!(
                "⚠️  max_slots {} exceeds the selection size, using {}",
                options.max_slots, MAX_SELECTION
            );
            options.max_slots = MAX_SELECTION;
        }
        self.options = options;
        self
    }

    /// Excludes characters for this session only; the profile is untouched.
    pub fn with_extra_exclusions<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        let canonical: Vec<String> = names.iter().map(|n| self.canonical(n.as_ref())).collect();
        self.transient_excluded.extend(canonical);
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn language(&self) -> Language {
        self.profile.language
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Key for exclusions and team members: the canonical name.
    fn canonical(&self, name: &str) -> String {
        self.catalog.canonical(name, self.language()).to_string()
    }

    fn persist(&self) -> ComboResult<()> {
        match &self.profile_path {
            Some(path) => self.profile.save_to_file(path),
            None => Ok(()),
        }
    }

    /// Toggles a character. Returns whether it is selected afterwards.
    pub fn select(&mut self, name: &str) -> bool {
        if self.selection.remove(name) {
            return false;
        }
        self.selection.insert(name)
    }

    pub fn set_selection<S: AsRef<str>>(&mut self, names: &[S]) {
        self.selection = Selection::from_names(names);
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    /// Returns whether the character is excluded afterwards.
    pub fn toggle_exclusion(&mut self, name: &str) -> ComboResult<bool> {
        let key = self.canonical(name);
        let excluded = if self.profile.excluded.remove(&key) {
            false
        } else {
            self.profile.excluded.insert(key);
            true
        };
        self.persist()?;
        Ok(excluded)
    }

    /// Switches language, translating the current selection along with it.
    pub fn set_language(&mut self, language: Language) -> ComboResult<()> {
        let from = self.profile.language;
        let translated: Vec<&str> = self
            .selection
            .as_slice()
            .iter()
            .map(|name| self.catalog.translate(name, from, language))
            .collect();
        self.selection = Selection::from_names(&translated);
        self.profile.language = language;
        self.persist()
    }

    /// Translates a roster name into another language.
    pub fn localized_name<'a>(&'a self, name: &'a str, target: Language) -> &'a str {
        self.catalog.translate(name, self.language(), target)
    }

    pub fn activated(&self) -> Vec<&Card> {
        evaluator::activated_cards(&self.catalog, self.selection.as_slice(), self.language())
    }

    /// Every roster character that is neither excluded nor already in a team,
    /// in roster order.
    pub fn available_characters(&self) -> Vec<String> {
        let used = self.profile.team_members();
        self.catalog
            .characters(self.language())
            .iter()
            .filter(|c| {
                let key = self.catalog.canonical(c, self.language());
                !self.profile.excluded.contains(key)
                    && !self.transient_excluded.contains(key)
                    && !used.contains(key)
            })
            .cloned()
            .collect()
    }

    /// Names of a saved team in the session language.
    pub fn team(&self, team: &str) -> Option<Vec<String>> {
        self.profile.teams.get(team).map(|members| {
            members
                .iter()
                .map(|m| {
                    self.catalog
                        .translate(m, Language::CANONICAL, self.language())
                        .to_string()
                })
                .collect()
        })
    }

    pub fn eligible_cards(&self, filter: &TypeFilter) -> Vec<&Card> {
        filter.apply(&self.catalog, self.language())
    }

    /// Fills the free slots with the best combination for `filter`. The
    /// current selection is kept and the found characters are appended.
    pub fn autofill<CB: ProgressCallback>(
        &mut self,
        filter: &TypeFilter,
        callback: &CB,
    ) -> ComboResult<AutofillReport> {
        let outcome = {
            let available = self.available_characters();
            let eligible = self.eligible_cards(filter);
            info!(
                "🧩 Autofill: filter '{}', {} eligible cards, {} available characters, {} preselected",
                filter,
                eligible.len(),
                available.len(),
                self.selection.len()
            );
            Search::new(&self.catalog, self.language(), self.options.clone()).run(
                &available,
                self.selection.as_slice(),
                Some(eligible.as_slice()),
                callback,
            )?
        };

        let mut added = Vec::new();
        match &outcome {
            SearchOutcome::Found(combo) => {
                for name in &combo.characters {
                    if self.selection.insert(name) {
                        added.push(name.clone());
                    }
                }
            }
            SearchOutcome::NoCombinationFound(reason) => {
                warn!("⚠️  No combination found: {}", reason);
            }
        }

        let activated = self.activated().iter().map(|c| c.id.clone()).collect();
        Ok(AutofillReport {
            filter: filter.to_string(),
            outcome,
            added,
            selection: self.selection.as_slice().to_vec(),
            activated,
        })
    }

    /// Runs the search for an autofill on a background thread. The caller
    /// applies the result with [`ComboSession::apply_autofill`].
    pub fn spawn_autofill<CB>(
        &self,
        filter: TypeFilter,
        callback: CB,
    ) -> JoinHandle<ComboResult<SearchOutcome>>
    where
        CB: ProgressCallback + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        let language = self.language();
        let options = self.options.clone();
        let available = self.available_characters();
        let preselected = self.selection.as_slice().to_vec();

        thread::spawn(move || {
            let eligible = filter.apply(&catalog, language);
            Search::new(&catalog, language, options).run(
                &available,
                &preselected,
                Some(eligible.as_slice()),
                &callback,
            )
        })
    }

    /// Appends the characters of a background search result. Returns the
    /// characters actually added.
    pub fn apply_autofill(&mut self, outcome: &SearchOutcome) -> Vec<String> {
        outcome
            .characters()
            .iter()
            .filter(|name| self.selection.insert(name))
            .cloned()
            .collect()
    }

    pub fn save_team(&mut self, team: &str) -> ComboResult<()> {
        let team = team.trim();
        if team.is_empty() || team.contains(':') {
            return Err(ComboError::InvalidArgument(format!(
                "invalid team name '{}'",
                team
            )));
        }
        let members: Vec<String> = self
            .selection
            .as_slice()
            .iter()
            .map(|c| self.canonical(c))
            .collect();
        let clash: BTreeSet<&str> = self.profile.members_of_other_teams(team);
        if let Some(dup) = members.iter().find(|c| clash.contains(c.as_str())) {
            warn!("⚠️  '{}' is already part of another team", dup);
        }
        self.profile.teams.insert(team.to_string(), members);
        self.persist()?;
        info!("💾 Team '{}' saved", team);
        Ok(())
    }

    /// Replaces the selection with a saved team. An unknown team selects
    /// nothing.
    pub fn select_team(&mut self, team: &str) -> bool {
        match self.team(team) {
            Some(members) => {
                self.selection = Selection::from_names(&members);
                true
            }
            None => {
                self.clear_selection();
                false
            }
        }
    }
}

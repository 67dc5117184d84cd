use crate::error::ComboResult;
use crate::language::Language;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Per-user settings: display language, excluded characters and saved teams.
/// Excluded characters and team members are stored by canonical (DE) name.
///
/// Stored as a small sectioned text file:
///
/// ```text
/// [Settings]
/// language: EN
///
/// [Excluded]
/// Wolf
///
/// [Teams]
/// Team 1: Wolf,Bear
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub language: Language,
    pub excluded: BTreeSet<String>,
    pub teams: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Settings,
    Excluded,
    Teams,
    Unknown,
}

impl Profile {
    /// A missing file yields the default profile.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ComboResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No profile at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut profile = Self::default();
        let mut section = Section::None;

        for line in content.lines().map(str::trim) {
            if line.starts_with('[') && line.ends_with(']') {
                section = match &line[1..line.len() - 1] {
                    "Settings" => Section::Settings,
                    "Excluded" => Section::Excluded,
                    "Teams" => Section::Teams,
                    _ => Section::Unknown,
                };
                continue;
            }
            if line.is_empty() {
                continue;
            }

            match section {
                Section::Settings => {
                    if let Some((key, value)) = line.split_once(':') {
                        if key.trim() == "language" {
                            match Language::parse(value) {
                                Ok(lang) => profile.language = lang,
                                Err(e) => warn!("⚠️  Ignoring profile setting: {}", e),
                            }
                        }
                    }
                }
                Section::Excluded => {
                    profile.excluded.insert(line.to_string());
                }
                Section::Teams => {
                    if let Some((name, members)) = line.split_once(':') {
                        let members = members
                            .split(',')
                            .map(str::trim)
                            .filter(|m| !m.is_empty())
                            .map(str::to_string)
                            .collect();
                        profile.teams.insert(name.trim().to_string(), members);
                    }
                }
                Section::None | Section::Unknown => {}
            }
        }
        profile
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "[Settings]");
        let _ = writeln!(out, "language: {}\n", self.language);
        let _ = writeln!(out, "[Excluded]");
        for name in &self.excluded {
            let _ = writeln!(out, "{}", name);
        }
        let _ = writeln!(out, "\n[Teams]");
        for (team, members) in &self.teams {
            let _ = writeln!(out, "{}: {}", team, members.join(","));
        }
        out
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ComboResult<()> {
        fs::write(path.as_ref(), self.render())?;
        debug!("Profile saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Characters already committed to some saved team.
    pub fn team_members(&self) -> BTreeSet<&str> {
        self.teams
            .values()
            .flat_map(|members| members.iter().map(String::as_str))
            .collect()
    }

    /// Members of every team except `team`.
    pub fn members_of_other_teams(&self, team: &str) -> BTreeSet<&str> {
        self.teams
            .iter()
            .filter(|(name, _)| name.as_str() != team)
            .flat_map(|(_, members)| members.iter().map(String::as_str))
            .collect()
    }
}

use crate::error::{ComboError, ComboResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Languages the catalog is localized in.
///
/// `De` is the canonical language: a character's German name is its identity
/// across every other language.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Language {
    #[default]
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "DE")]
    De,
}

impl Language {
    pub const CANONICAL: Language = Language::De;

    pub fn parse(tag: &str) -> ComboResult<Self> {
        Language::from_str(tag.trim()).map_err(|_| {
            ComboError::InvalidArgument(format!("unknown language tag '{}'", tag.trim()))
        })
    }

    /// The catalog key for this language ("EN", "DE").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::De => "DE",
        }
    }

    /// The type-filter value meaning "no restriction".
    pub fn any_type_label(&self) -> &'static str {
        match self {
            Self::En => "random",
            Self::De => "zufällig",
        }
    }
}

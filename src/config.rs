use crate::api::MAX_SELECTION;
use crate::error::{ComboError, ComboResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Total selection size the search fills up to
    #[arg(long, default_value_t = 6)]
    pub max_slots: usize,
    /// Worker threads for the search (0 = run on the calling thread)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
    /// Combinations evaluated between progress reports (0 = silent)
    #[arg(long, default_value_t = 50_000)]
    pub progress_every: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_slots: 6,
            threads: 0,
            progress_every: 50_000,
        }
    }
}

impl SearchParams {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ComboResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ComboError::Config(format!("cannot read search params {}: {}", path.display(), e))
        })?;
        let params: SearchParams = serde_json::from_str(&content)?;
        params.validate()?;
        info!("⚙️  Loaded search params from {}", path.display());
        Ok(params)
    }

    /// Copies over only the values the user typed on the command line.
    pub fn merge_from_cli(&mut self, cli: &SearchParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(max_slots, "max_slots");
        update_if_present!(threads, "threads");
        update_if_present!(progress_every, "progress_every");
    }

    pub fn validate(&self) -> ComboResult<()> {
        if self.max_slots == 0 {
            return Err(ComboError::Config("max_slots must be at least 1".into()));
        }
        if self.max_slots > MAX_SELECTION {
            return Err(ComboError::Config(format!(
                "max_slots must be at most {} (got {})",
                MAX_SELECTION, self.max_slots
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches, Parser};

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        params: SearchParams,
    }

    #[test]
    fn defaults_match_clap_defaults() {
        let matches = Harness::command().get_matches_from(["test"]);
        let parsed = Harness::from_arg_matches(&matches).unwrap();
        assert_eq!(parsed.params, SearchParams::default());
    }

    #[test]
    fn merge_only_takes_explicit_flags() {
        let matches = Harness::command().get_matches_from(["test", "--threads", "4"]);
        let cli = Harness::from_arg_matches(&matches).unwrap().params;

        let mut from_file = SearchParams {
            max_slots: 5,
            threads: 0,
            progress_every: 10,
        };
        from_file.merge_from_cli(&cli, &matches);

        assert_eq!(from_file.max_slots, 5);
        assert_eq!(from_file.threads, 4);
        assert_eq!(from_file.progress_every, 10);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let params: SearchParams = serde_json::from_str(r#"{"threads": 2}"#).unwrap();
        assert_eq!(params.threads, 2);
        assert_eq!(params.max_slots, 6);
    }

    #[test]
    fn slots_beyond_selection_size_are_rejected() {
        let params = SearchParams {
            max_slots: 8,
            ..SearchParams::default()
        };
        assert!(matches!(params.validate(), Err(ComboError::Config(_))));

        let params = SearchParams {
            max_slots: MAX_SELECTION,
            ..SearchParams::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_slots_is_rejected() {
        let params = SearchParams {
            max_slots: 0,
            ..SearchParams::default()
        };
        assert!(params.validate().is_err());
    }
}

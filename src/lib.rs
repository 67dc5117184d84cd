pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod filter;
pub mod language;
pub mod profile;
pub mod search;
// cmd and reports belong to the binary crate (main.rs).

pub use crate::catalog::{Card, Catalog, Character};
pub use crate::error::{ComboError, ComboResult};
pub use crate::evaluator::activated_cards;
pub use crate::language::Language;
pub use crate::search::{best_combination, SearchOutcome};

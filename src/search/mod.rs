pub mod combinations;

pub use self::combinations::{binomial, Combinations};

use crate::catalog::{Card, Catalog, CharId, LanguageView};
use crate::config::SearchParams;
use crate::error::{ComboError, ComboResult};
use crate::evaluator::Presence;
use crate::language::Language;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tracing::{debug, info};

pub const DEFAULT_MAX_SLOTS: usize = 6;

/// Receives periodic updates while combinations are enumerated.
/// Returning `false` aborts the search with [`ComboError::Cancelled`].
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, evaluated: u64, total: u64, best: usize) -> bool;
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _evaluated: u64, _total: u64, _best: usize) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_slots: usize,
    /// Worker threads; 0 or 1 runs on the calling thread.
    pub threads: usize,
    /// Combinations between progress callbacks; 0 disables them.
    pub progress_every: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_slots: DEFAULT_MAX_SLOTS,
            threads: 0,
            progress_every: 50_000,
        }
    }
}

impl From<&SearchParams> for SearchOptions {
    fn from(params: &SearchParams) -> Self {
        Self {
            max_slots: params.max_slots,
            threads: params.threads,
            progress_every: params.progress_every,
        }
    }
}

/// The characters to add to the preselection, and how many cards the merged
/// selection activates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combination {
    pub characters: Vec<String>,
    pub activated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoCombinationReason {
    NoEligibleCards,
    NoAvailableCharacters,
    UniverseTooSmall { needed: usize, available: usize },
    NoActivation,
}

impl fmt::Display for NoCombinationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEligibleCards => write!(f, "no cards match the current filter"),
            Self::NoAvailableCharacters => write!(f, "no characters are available"),
            Self::UniverseTooSmall { needed, available } => write!(
                f,
                "{} slots to fill but only {} relevant characters available",
                needed, available
            ),
            Self::NoActivation => write!(f, "no combination activates any card"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SearchOutcome {
    Found(Combination),
    NoCombinationFound(NoCombinationReason),
}

impl SearchOutcome {
    pub fn combination(&self) -> Option<&Combination> {
        match self {
            Self::Found(c) => Some(c),
            Self::NoCombinationFound(_) => None,
        }
    }

    /// The characters to add; empty when nothing was found.
    pub fn characters(&self) -> &[String] {
        self.combination().map_or(&[], |c| c.characters.as_slice())
    }
}

/// Everything the enumeration needs, resolved to character ids.
struct Plan<'v> {
    view: &'v LanguageView,
    universe: Vec<CharId>,
    base: Presence,
    requirements: Vec<&'v [CharId]>,
    slots: usize,
}

impl Plan<'_> {
    fn count(&self, presence: &Presence) -> usize {
        self.requirements
            .iter()
            .filter(|req| presence.satisfies(req))
            .count()
    }

    fn branches(&self) -> usize {
        self.universe.len() + 1 - self.slots
    }
}

#[derive(Debug, Clone, Default)]
struct Best {
    count: usize,
    subset: Vec<usize>,
}

struct Control<'c, CB: ProgressCallback> {
    callback: &'c CB,
    every: u64,
    total: u64,
    bound: usize,
    evaluated: AtomicU64,
    best_seen: AtomicUsize,
    saturated_at: AtomicUsize,
    cancelled: AtomicBool,
}

impl<CB: ProgressCallback> Control<'_, CB> {
    /// Returns `false` once the search must stop.
    fn tick(&self) -> bool {
        let n = self.evaluated.fetch_add(1, Ordering::Relaxed) + 1;
        if self.every > 0 && n % self.every == 0 {
            let best = self.best_seen.load(Ordering::Relaxed);
            if !self.callback.on_progress(n, self.total, best) {
                self.cancelled.store(true, Ordering::Relaxed);
            }
        }
        !self.cancelled.load(Ordering::Relaxed)
    }
}

/// Finds the subset of candidate characters that, added to a preselection,
/// activates the most cards.
pub struct Search<'a> {
    catalog: &'a Catalog,
    language: Language,
    options: SearchOptions,
}

impl<'a> Search<'a> {
    pub fn new(catalog: &'a Catalog, language: Language, options: SearchOptions) -> Self {
        Self {
            catalog,
            language,
            options,
        }
    }

    /// `valid_cards` restricts which cards count; `None` means the whole
    /// catalog. The cards must come from this search's catalog.
    pub fn run<A, P, CB>(
        &self,
        available: &[A],
        preselected: &[P],
        valid_cards: Option<&[&Card]>,
        callback: &CB,
    ) -> ComboResult<SearchOutcome>
    where
        A: AsRef<str>,
        P: AsRef<str>,
        CB: ProgressCallback,
    {
        let view = self.catalog.view(self.language);
        let eligible = self.eligible(valid_cards)?;

        let preselected_count = preselected
            .iter()
            .map(|p| p.as_ref())
            .collect::<BTreeSet<&str>>()
            .len();
        let base = Presence::from_names(view, preselected);

        if preselected_count >= self.options.max_slots {
            let activated = eligible
                .iter()
                .filter(|&&i| base.satisfies(view.requirement(i)))
                .count();
            return Ok(SearchOutcome::Found(Combination {
                characters: Vec::new(),
                activated,
            }));
        }
        let slots = self.options.max_slots - preselected_count;

        if eligible.is_empty() {
            return Ok(SearchOutcome::NoCombinationFound(
                NoCombinationReason::NoEligibleCards,
            ));
        }
        if available.is_empty() {
            return Ok(SearchOutcome::NoCombinationFound(
                NoCombinationReason::NoAvailableCharacters,
            ));
        }

        let pool = Presence::from_names(view, available);
        let universe: Vec<CharId> = eligible
            .iter()
            .flat_map(|&i| view.requirement(i).iter().copied())
            .filter(|&id| pool.contains(id) && !base.contains(id))
            .collect::<BTreeSet<CharId>>()
            .into_iter()
            .collect();

        if universe.len() < slots {
            return Ok(SearchOutcome::NoCombinationFound(
                NoCombinationReason::UniverseTooSmall {
                    needed: slots,
                    available: universe.len(),
                },
            ));
        }

        // Cards that no choice of `slots` universe characters can satisfy never
        // contribute to a count, so they are dropped up front.
        let mut reachable = base.clone();
        for &id in &universe {
            reachable.set(id, true);
        }
        let requirements: Vec<&[CharId]> = eligible
            .iter()
            .map(|&i| view.requirement(i))
            .filter(|req| {
                reachable.satisfies(req) && req.iter().filter(|&&id| !base.contains(id)).count() <= slots
            })
            .collect();

        debug!(
            "Search plan: {} slots, {} candidates, {}/{} satisfiable cards",
            slots,
            universe.len(),
            requirements.len(),
            eligible.len()
        );

        if requirements.is_empty() {
            return Ok(SearchOutcome::NoCombinationFound(
                NoCombinationReason::NoActivation,
            ));
        }

        let plan = Plan {
            view,
            universe,
            base,
            requirements,
            slots,
        };
        self.enumerate(&plan, callback)
    }

    fn eligible(&self, valid_cards: Option<&[&Card]>) -> ComboResult<Vec<usize>> {
        let Some(cards) = valid_cards else {
            return Ok((0..self.catalog.len()).collect());
        };

        let mut indices = Vec::with_capacity(cards.len());
        for card in cards {
            match self.catalog.cards().get(card.index()) {
                Some(own) if own.id == card.id => indices.push(card.index()),
                _ => {
                    return Err(ComboError::InvalidArgument(format!(
                        "card '{}' is not part of the searched catalog",
                        card.id
                    )))
                }
            }
        }
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }

    fn enumerate<CB: ProgressCallback>(
        &self,
        plan: &Plan<'_>,
        callback: &CB,
    ) -> ComboResult<SearchOutcome> {
        let total = binomial(plan.universe.len(), plan.slots);
        info!(
            "🔎 Searching {} combinations of {} from {} candidates",
            total,
            plan.slots,
            plan.universe.len()
        );

        let control = Control {
            callback,
            every: self.options.progress_every,
            total,
            bound: plan.requirements.len(),
            evaluated: AtomicU64::new(0),
            best_seen: AtomicUsize::new(0),
            saturated_at: AtomicUsize::new(usize::MAX),
            cancelled: AtomicBool::new(false),
        };

        let results: Vec<Best> = if self.options.threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.threads)
                .build()
                .map_err(|e| ComboError::Config(e.to_string()))?;
            pool.install(|| {
                (0..plan.branches())
                    .into_par_iter()
                    .map(|first| scan_branch(plan, first, &control))
                    .collect()
            })
        } else {
            let mut results = Vec::with_capacity(plan.branches());
            for first in 0..plan.branches() {
                let best = scan_branch(plan, first, &control);
                let saturated = best.count == control.bound;
                results.push(best);
                if saturated || control.cancelled.load(Ordering::Relaxed) {
                    break;
                }
            }
            results
        };

        let evaluated = control.evaluated.load(Ordering::Relaxed);
        if control.cancelled.load(Ordering::Relaxed) {
            return Err(ComboError::Cancelled { evaluated });
        }

        // Branches are in lexicographic order, so a strict comparison keeps
        // the first subset to reach the maximum.
        let mut winner = Best::default();
        for best in results {
            if best.count > winner.count {
                winner = best;
            }
        }

        debug!(
            "Evaluated {} of {} combinations, best activates {}",
            evaluated, total, winner.count
        );

        if winner.count == 0 {
            return Ok(SearchOutcome::NoCombinationFound(
                NoCombinationReason::NoActivation,
            ));
        }

        let characters = winner
            .subset
            .iter()
            .map(|&i| plan.view.name(plan.universe[i]).to_string())
            .collect();

        Ok(SearchOutcome::Found(Combination {
            characters,
            activated: winner.count,
        }))
    }
}

/// Scans every subset whose smallest universe index is `first`.
fn scan_branch<CB: ProgressCallback>(plan: &Plan<'_>, first: usize, control: &Control<'_, CB>) -> Best {
    let mut best = Best::default();
    let mut presence = plan.base.clone();
    presence.set(plan.universe[first], true);

    let offset = first + 1;
    let mut rest = Combinations::new(plan.universe.len() - offset, plan.slots - 1);

    while let Some(tail) = rest.next_combination() {
        if control.saturated_at.load(Ordering::Relaxed) < first || !control.tick() {
            break;
        }

        for &j in tail {
            presence.set(plan.universe[offset + j], true);
        }
        let count = plan.count(&presence);
        for &j in tail {
            presence.set(plan.universe[offset + j], false);
        }

        if count > best.count {
            best.count = count;
            best.subset.clear();
            best.subset.push(first);
            best.subset.extend(tail.iter().map(|&j| offset + j));
            control.best_seen.fetch_max(count, Ordering::Relaxed);

            if count == control.bound {
                control.saturated_at.fetch_min(first, Ordering::Relaxed);
                break;
            }
        }
    }
    best
}

/// Sequential search with no progress reporting.
pub fn best_combination<A: AsRef<str>, P: AsRef<str>>(
    catalog: &Catalog,
    available: &[A],
    preselected: &[P],
    language: Language,
    valid_cards: Option<&[&Card]>,
    max_slots: usize,
) -> ComboResult<SearchOutcome> {
    let options = SearchOptions {
        max_slots,
        ..SearchOptions::default()
    };
    Search::new(catalog, language, options).run(available, preselected, valid_cards, &NoProgress)
}

mod common;

use common::{names, CatalogBuilder};
use comboforge::api::ComboSession;
use comboforge::catalog::Catalog;
use comboforge::error::ComboError;
use comboforge::filter::TypeFilter;
use comboforge::language::Language;
use comboforge::profile::Profile;
use comboforge::search::{NoProgress, SearchOptions, SearchOutcome};
use std::sync::Arc;
use tempfile::tempdir;

fn catalog() -> Arc<Catalog> {
    Arc::new(
        CatalogBuilder::new()
            .typed_card("Blade", "Attack", &["A", "B"])
            .typed_card("Shield", "Defense", &["C", "D"])
            .typed_card("Wall", "Defense", &["D", "E"])
            .localized_card("Pack", ("Attack", "Angriff"), &[("Owl", "Eule"), ("Bear", "Baer")])
            .build(),
    )
}

fn session() -> ComboSession {
    ComboSession::new(catalog(), Profile::default())
}

fn session_with_slots(max_slots: usize) -> ComboSession {
    session().with_options(SearchOptions {
        max_slots,
        ..SearchOptions::default()
    })
}

#[test]
fn test_select_toggles() {
    let mut session = session();
    assert!(session.select("A"));
    assert!(session.select("B"));
    assert!(!session.select("A"));
    assert_eq!(session.selection().as_slice(), &["B"]);
}

#[test]
fn test_autofill_keeps_selection_and_appends() {
    let mut session = session_with_slots(3);
    session.set_selection(&["C"]);

    let report = session.autofill(&TypeFilter::parse("Defense"), &NoProgress).unwrap();

    assert_eq!(report.added, names(&["D", "E"]));
    assert_eq!(report.selection, names(&["C", "D", "E"]));
    assert_eq!(report.activated, names(&["Shield", "Wall"]));
    assert_eq!(session.selection().as_slice(), report.selection.as_slice());
}

#[test]
fn test_autofill_on_full_selection_adds_nothing() {
    let mut session = session();
    session.set_selection(&["A", "B", "C", "D", "E", "Owl"]);

    let report = session.autofill(&TypeFilter::Any, &NoProgress).unwrap();

    assert!(report.added.is_empty());
    match report.outcome {
        SearchOutcome::Found(combo) => {
            assert!(combo.characters.is_empty());
            assert_eq!(combo.activated, 3);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_no_combination_leaves_selection_alone() {
    let mut session = session();
    session.set_selection(&["A"]);

    let report = session
        .autofill(&TypeFilter::parse("Healing"), &NoProgress)
        .unwrap();

    assert!(matches!(report.outcome, SearchOutcome::NoCombinationFound(_)));
    assert_eq!(session.selection().as_slice(), &["A"]);
}

#[test]
fn test_spawned_autofill_applies_later() {
    let mut session = session_with_slots(4);
    session.set_selection(&["A"]);

    let handle = session.spawn_autofill(TypeFilter::Any, NoProgress);
    let outcome = handle.join().unwrap().unwrap();
    let added = session.apply_autofill(&outcome);

    assert_eq!(added.len(), 3);
    assert_eq!(session.selection().len(), 4);
    assert_eq!(session.selection().as_slice()[0], "A");
    assert_eq!(session.activated().len(), 2);
}

#[test]
fn test_exclusions_persist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.cfg");

    let mut session = session().with_profile_path(&path);
    assert!(session.toggle_exclusion("A").unwrap());
    assert!(!session.available_characters().contains(&"A".to_string()));

    let reloaded = Profile::load_from_file(&path).unwrap();
    assert!(reloaded.excluded.contains("A"));

    assert!(!session.toggle_exclusion("A").unwrap());
    let reloaded = Profile::load_from_file(&path).unwrap();
    assert!(reloaded.excluded.is_empty());
}

#[test]
fn test_transient_exclusions_do_not_persist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.cfg");

    let mut session = session()
        .with_profile_path(&path)
        .with_extra_exclusions(&["C"]);
    session.toggle_exclusion("A").unwrap();

    let available = session.available_characters();
    assert!(!available.contains(&"A".to_string()));
    assert!(!available.contains(&"C".to_string()));

    let reloaded = Profile::load_from_file(&path).unwrap();
    assert_eq!(reloaded.excluded.len(), 1);
}

#[test]
fn test_team_members_are_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.cfg");

    let mut session = session().with_profile_path(&path);
    session.set_selection(&["A", "B"]);
    session.save_team("Alpha").unwrap();

    let available = session.available_characters();
    assert!(!available.contains(&"A".to_string()));
    assert!(!available.contains(&"B".to_string()));
    assert!(available.contains(&"C".to_string()));

    let reloaded = Profile::load_from_file(&path).unwrap();
    assert_eq!(reloaded.teams["Alpha"], names(&["A", "B"]));
}

#[test]
fn test_select_team_replaces_selection() {
    let mut session = session();
    session.set_selection(&["A", "B"]);
    session.save_team("Alpha").unwrap();
    session.set_selection(&["C"]);

    assert!(session.select_team("Alpha"));
    assert_eq!(session.selection().as_slice(), &["A", "B"]);

    assert!(!session.select_team("Nobody"));
    assert!(session.selection().is_empty());
}

#[test]
fn test_invalid_team_name_is_rejected() {
    let mut session = session();
    assert!(matches!(
        session.save_team("  "),
        Err(ComboError::InvalidArgument(_))
    ));
    assert!(matches!(
        session.save_team("a:b"),
        Err(ComboError::InvalidArgument(_))
    ));
}

#[test]
fn test_language_switch_translates_selection() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.cfg");

    let mut session = session().with_profile_path(&path);
    session.set_selection(&["Owl", "Bear", "A"]);
    assert_eq!(session.activated().len(), 1);

    session.set_language(Language::De).unwrap();

    assert_eq!(session.selection().as_slice(), &["Eule", "Baer", "A"]);
    assert_eq!(session.activated().len(), 1);
    assert_eq!(session.localized_name("Eule", Language::En), "Owl");

    let reloaded = Profile::load_from_file(&path).unwrap();
    assert_eq!(reloaded.language, Language::De);
}

#[test]
fn test_eligible_cards_follow_language() {
    let mut session = session();
    let attack = TypeFilter::parse("Angriff");
    assert!(session.eligible_cards(&attack).is_empty());

    session.set_language(Language::De).unwrap();
    let ids: Vec<&str> = session
        .eligible_cards(&attack)
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, vec!["Pack"]);
}

#[test]
fn test_slots_are_capped_at_selection_size() {
    let catalog = Arc::new(
        CatalogBuilder::new()
            .card("C1", &["A", "B", "C", "D"])
            .card("C2", &["E", "F", "G", "H"])
            .build(),
    );
    let mut session = ComboSession::new(catalog, Profile::default()).with_options(SearchOptions {
        max_slots: 8,
        ..SearchOptions::default()
    });

    let report = session.autofill(&TypeFilter::Any, &NoProgress).unwrap();

    let claimed = report.outcome.combination().map(|c| c.activated).unwrap();
    assert_eq!(report.added.len(), 6);
    assert_eq!(report.selection.len(), 6);
    assert_eq!(claimed, 1);
    assert_eq!(report.activated.len(), claimed);
}

#[test]
fn test_exclusion_survives_language_switch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.cfg");

    let mut session = session().with_profile_path(&path);
    session.toggle_exclusion("Owl").unwrap();
    assert!(!session.available_characters().contains(&"Owl".to_string()));

    session.set_language(Language::De).unwrap();
    let available = session.available_characters();
    assert!(!available.contains(&"Eule".to_string()));
    assert!(available.contains(&"Baer".to_string()));

    let reloaded = Profile::load_from_file(&path).unwrap();
    assert!(reloaded.excluded.contains("Eule"));

    // Toggling the German name clears the same exclusion.
    assert!(!session.toggle_exclusion("Eule").unwrap());
    assert!(session.available_characters().contains(&"Eule".to_string()));
}

#[test]
fn test_transient_exclusion_survives_language_switch() {
    let mut session = session().with_extra_exclusions(&["Bear"]);
    session.set_language(Language::De).unwrap();
    assert!(!session.available_characters().contains(&"Baer".to_string()));
}

#[test]
fn test_team_survives_language_switch() {
    let mut session = session();
    session.set_selection(&["Owl", "A"]);
    session.save_team("Alpha").unwrap();
    assert_eq!(session.profile().teams["Alpha"], names(&["Eule", "A"]));

    session.set_language(Language::De).unwrap();
    assert!(!session.available_characters().contains(&"Eule".to_string()));

    assert!(session.select_team("Alpha"));
    assert_eq!(session.selection().as_slice(), &["Eule", "A"]);

    session.set_language(Language::En).unwrap();
    assert_eq!(session.team("Alpha"), Some(names(&["Owl", "A"])));
}

use comboforge::api::{AutofillReport, ComboSession};
use comboforge::catalog::{Card, Catalog};
use comboforge::filter::TypeFilter;
use comboforge::language::Language;
use comboforge::search::SearchOutcome;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use strum::IntoEnumIterator;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Two rows of three, the way the selection panel lays them out.
pub fn selection(title: &str, characters: &[String], added: &[String]) {
    println!("\n{}: {}/6", title, characters.len());
    let mut table = new_table();

    for chunk in characters.chunks(3) {
        let cells: Vec<Cell> = chunk
            .iter()
            .map(|name| {
                let cell = Cell::new(name).set_alignment(CellAlignment::Center);
                if added.contains(name) {
                    cell.fg(Color::Green).add_attribute(Attribute::Bold)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

pub fn activated(cards: &[&Card], language: Language) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Card").add_attribute(Attribute::Bold),
        Cell::new("Type"),
        Cell::new("Requires"),
    ]);

    for card in cards {
        table.add_row(vec![
            Cell::new(card.name.get(language)).add_attribute(Attribute::Bold),
            Cell::new(card.kind.get(language)).fg(Color::Cyan),
            Cell::new(card.required(language).collect::<Vec<_>>().join(", ")),
        ]);
    }
    println!("\nActivated Cards: {}", cards.len());
    println!("{}", table);
}

pub fn autofill(report: &AutofillReport) {
    match &report.outcome {
        SearchOutcome::Found(combo) => {
            println!(
                "\n=== 🏆 BEST COMBINATION ({}) ===\nAdded: {}\nActivates: {}",
                report.filter,
                combo.characters.join(", "),
                combo.activated
            );
        }
        SearchOutcome::NoCombinationFound(reason) => {
            println!("\n=== NO COMBINATION ({}) ===\n{}", report.filter, reason);
        }
    }
    selection("Selection", &report.selection, &report.added);
}

pub fn catalog_summary(catalog: &Catalog) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Language").add_attribute(Attribute::Bold),
        Cell::new("Cards"),
        Cell::new("Characters"),
        Cell::new("Types"),
    ]);
    for i in 1..=2 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for lang in Language::iter() {
        // First option is the "random" label.
        let types = TypeFilter::options(catalog, lang);
        table.add_row(vec![
            Cell::new(lang.tag()).add_attribute(Attribute::Bold),
            Cell::new(catalog.len()),
            Cell::new(catalog.characters(lang).len()),
            Cell::new(types[1..].join(", ")),
        ]);
    }
    println!("\n{}", table);
}

pub fn teams(session: &ComboSession) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Team").add_attribute(Attribute::Bold),
        Cell::new("Members"),
    ]);
    for name in session.profile().teams.keys() {
        let members = session.team(name).unwrap_or_default();
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(members.join(", ")),
        ]);
    }
    println!("\n{}", table);
}

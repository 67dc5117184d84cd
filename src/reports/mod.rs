mod tables;

pub use self::tables::{
    activated as print_activated_report, autofill as print_autofill_report,
    catalog_summary as print_catalog_summary, selection as print_selection_grid,
    teams as print_teams_report,
};

use crate::reports;
use clap::Args;
use comboforge::catalog::Catalog;
use std::fs;
use tracing::{error, info, warn};

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Report malformed cards and keep going instead of failing
    #[arg(long, default_value_t = false)]
    pub lenient: bool,
}

/// Returns the process exit code.
pub fn run(args: &ValidateArgs, data_path: &str) -> i32 {
    info!("🔎 === CATALOG AUDIT === 🔎");
    let content = match fs::read_to_string(data_path) {
        Ok(c) => c,
        Err(e) => {
            error!("❌ Cannot read {}: {}", data_path, e);
            return 1;
        }
    };

    let loaded = if args.lenient {
        Catalog::from_json(&content)
    } else {
        Catalog::from_json_strict(&content)
    };

    let catalog = match loaded {
        Ok(c) => c,
        Err(e) => {
            error!("❌ {}", e);
            return 1;
        }
    };

    for skipped in catalog.skipped() {
        warn!("⚠️  {}: {}", skipped.id, skipped.reason);
    }

    reports::print_catalog_summary(&catalog);
    println!("OK: {} cards, {} skipped", catalog.len(), catalog.skipped().len());
    0
}

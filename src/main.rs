use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use comboforge::api::ComboSession;
use comboforge::catalog::Catalog;
use comboforge::config::SearchParams;
use comboforge::language::Language;
use comboforge::profile::Profile;
use comboforge::search::SearchOptions;
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Card catalog (JSON)
    #[arg(global = true, short, long, default_value = "data.json")]
    data: String,

    /// Profile holding language, exclusions and teams
    #[arg(global = true, short, long, default_value = "config.cfg")]
    profile: String,

    /// Overrides the profile language (EN, DE)
    #[arg(global = true, short, long)]
    language: Option<String>,

    /// Search parameters (JSON); explicit flags still win
    #[arg(global = true, long)]
    params: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the cards a selection activates
    Activate(cmd::activate::ActivateArgs),
    /// Fill the free slots with the best combination
    Autofill(cmd::autofill::AutofillArgs),
    /// Check the catalog and print a summary
    Validate(cmd::validate::ValidateArgs),
    /// Manage saved teams
    Team(cmd::team::TeamArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing ComboForge...");

    if let Commands::Validate(args) = &cli.command {
        let code = cmd::validate::run(args, &cli.data);
        process::exit(code);
    }

    let catalog = Catalog::load_from_file(&cli.data).unwrap_or_else(|e| {
        error!("❌ FATAL ERROR LOADING CATALOG: {}", e);
        process::exit(1);
    });

    let mut profile = Profile::load_from_file(&cli.profile).unwrap_or_else(|e| {
        error!("❌ Failed to read profile {}: {}", cli.profile, e);
        process::exit(1);
    });

    if let Some(tag) = &cli.language {
        profile.language = Language::parse(tag).unwrap_or_else(|e| {
            error!("❌ {}", e);
            process::exit(1);
        });
    }
    info!("🌐 Language: {}", profile.language);

    let mut params = match &cli.command {
        Commands::Autofill(args) => args.config.search.clone(),
        _ => SearchParams::default(),
    };

    if let Some(path) = &cli.params {
        info!("⚙️  Loading search params from: {}", path);
        let mut file_params = SearchParams::load_from_file(path).unwrap_or_else(|e| {
            error!("❌ {}", e);
            process::exit(1);
        });
        if let Some(sub_matches) = matches.subcommand_matches("autofill") {
            file_params.merge_from_cli(&params, sub_matches);
        }
        params = file_params;
    }

    if let Err(e) = params.validate() {
        error!("❌ {}", e);
        process::exit(1);
    }

    let session = ComboSession::new(Arc::new(catalog), profile)
        .with_profile_path(&cli.profile)
        .with_options(SearchOptions::from(&params));

    let result = match cli.command {
        Commands::Activate(args) => cmd::activate::run(args, session),
        Commands::Autofill(args) => cmd::autofill::run(args, session),
        Commands::Team(args) => cmd::team::run(args, session),
        Commands::Validate(_) => Ok(()),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}

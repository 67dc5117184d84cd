use crate::reports;
use clap::Args;
use comboforge::api::ComboSession;
use comboforge::config::Config;
use comboforge::error::ComboResult;
use comboforge::filter::TypeFilter;
use comboforge::search::ProgressCallback;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct AutofillArgs {
    #[command(flatten)]
    pub config: Config,

    /// Characters already picked, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Characters to leave out for this run only
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Card type to aim for ("random" for any)
    #[arg(short = 't', long = "type", default_value = "random")]
    pub card_type: String,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

struct CliLogger;
impl ProgressCallback for CliLogger {
    fn on_progress(&self, evaluated: u64, total: u64, best: usize) -> bool {
        let pct = if total > 0 {
            evaluated as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        info!(
            "{:>12}/{} combinations ({:5.1}%) | Best: {} cards",
            evaluated, total, pct, best
        );
        true
    }
}

pub fn run(args: AutofillArgs, session: ComboSession) -> ComboResult<()> {
    let mut session = session.with_extra_exclusions(&args.exclude);
    session.set_selection(&args.select);

    let filter = TypeFilter::parse(&args.card_type);
    let report = session.autofill(&filter, &CliLogger)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    reports::print_autofill_report(&report);
    reports::print_activated_report(&session.activated(), session.language());
    Ok(())
}

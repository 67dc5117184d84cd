use crate::reports;
use clap::Args;
use comboforge::api::ComboSession;
use comboforge::error::ComboResult;

#[derive(Args, Debug, Clone)]
pub struct ActivateArgs {
    /// Selected characters, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Start from a saved team instead
    #[arg(short, long, conflicts_with = "select")]
    pub team: Option<String>,
}

pub fn run(args: ActivateArgs, mut session: ComboSession) -> ComboResult<()> {
    match &args.team {
        Some(team) => {
            if !session.select_team(team) {
                tracing::warn!("⚠️  Unknown team '{}'", team);
            }
        }
        None => session.set_selection(&args.select),
    }

    let language = session.language();
    reports::print_selection_grid("Selection", session.selection().as_slice(), &[]);
    reports::print_activated_report(&session.activated(), language);
    Ok(())
}

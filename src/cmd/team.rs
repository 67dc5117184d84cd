use crate::reports;
use clap::{Args, Subcommand};
use comboforge::api::ComboSession;
use comboforge::error::ComboResult;

#[derive(Args, Debug, Clone)]
pub struct TeamArgs {
    #[command(subcommand)]
    pub action: TeamAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TeamAction {
    /// Save a selection under a team name
    Save {
        name: String,
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<String>,
    },
    /// Show a team and the cards it activates
    Show { name: String },
    /// List every saved team
    List,
}

pub fn run(args: TeamArgs, mut session: ComboSession) -> ComboResult<()> {
    match args.action {
        TeamAction::Save { name, select } => {
            session.set_selection(&select);
            session.save_team(&name)?;
            reports::print_selection_grid(&name, session.selection().as_slice(), &[]);
        }
        TeamAction::Show { name } => {
            if !session.select_team(&name) {
                println!("No team named '{}'", name);
                return Ok(());
            }
            reports::print_selection_grid(&name, session.selection().as_slice(), &[]);
            reports::print_activated_report(&session.activated(), session.language());
        }
        TeamAction::List => reports::print_teams_report(&session),
    }
    Ok(())
}

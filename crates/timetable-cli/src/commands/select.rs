use clap::Subcommand;
use timetable_core::Config;

use super::{load_session, offering_line, print_offerings, save_session};

#[derive(Subcommand)]
pub enum SelectAction {
    /// Add an offering by its unique id
    Add {
        unique_id: String,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an offering by its unique id
    Remove { unique_id: String },
    /// List selected offerings in insertion order
    List {
        #[arg(long)]
        json: bool,
    },
    /// Remove every selected offering
    Clear,
    /// Total credits of the selection
    Credits,
}

pub fn run(action: SelectAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SelectAction::Add { unique_id, json } => {
            let (store, mut session) = load_session()?;
            let outcome = session.add(&unique_id);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            if !outcome.is_added() {
                return Err(outcome.summary().into());
            }
            save_session(&store, &session)?;
            if !json {
                println!("{}", outcome.summary());
            }
        }
        SelectAction::Remove { unique_id } => {
            let (store, mut session) = load_session()?;
            if session.remove(&unique_id) {
                save_session(&store, &session)?;
                println!("removed {unique_id}");
            } else {
                println!("{unique_id} was not selected");
            }
        }
        SelectAction::List { json } => {
            let (_, session) = load_session()?;
            let selection = session.selection();
            if json || selection.is_empty() {
                return print_offerings(selection.as_slice(), json);
            }
            let config = Config::load_or_default();
            for offering in selection {
                let color = selection
                    .color_index(&offering.unique_id)
                    .and_then(|rank| config.color_for(rank))
                    .unwrap_or("-");
                println!("{:<8} {}", color, offering_line(offering));
            }
        }
        SelectAction::Clear => {
            let (store, mut session) = load_session()?;
            session.clear_selection();
            save_session(&store, &session)?;
            println!("selection cleared");
        }
        SelectAction::Credits => {
            let (_, session) = load_session()?;
            println!("{}", session.selection().total_credits());
        }
    }
    Ok(())
}

pub mod catalog;
pub mod config;
pub mod filter;
pub mod grid;
pub mod select;

use timetable_core::{Session, SnapshotStore};

/// Restore the session saved by the previous command.
pub(crate) fn load_session() -> Result<(SnapshotStore, Session), Box<dyn std::error::Error>> {
    let store = SnapshotStore::open()?;
    let session = Session::from_snapshot(store.load()?);
    Ok((store, session))
}

pub(crate) fn save_session(store: &SnapshotStore, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    store.save(&session.snapshot())?;
    Ok(())
}

/// One line per offering: id, subject, title, staff, credits, slots.
pub(crate) fn offering_line(offering: &timetable_core::Offering) -> String {
    let slots: Vec<String> = offering
        .slots
        .iter()
        .map(|s| format!("{} {}", s.day.short(), s.time))
        .collect();
    format!(
        "{:<12} {:<10} {} | {} | {} cr | {}",
        offering.unique_id,
        offering.course_name,
        offering.display_name,
        offering.staff,
        offering.credits,
        slots.join(", ")
    )
}

pub(crate) fn print_offerings(
    offerings: &[timetable_core::Offering],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(offerings)?);
    } else if offerings.is_empty() {
        println!("no offerings");
    } else {
        for offering in offerings {
            println!("{}", offering_line(offering));
        }
    }
    Ok(())
}

use clap::Args;
use timetable_core::{BlockProjection, Config, GridRow, Offering, Selection, SlotLabel, TWO_HOUR_SLOTS};

use super::load_session;

const CELL_WIDTH: usize = 22;

#[derive(Args)]
pub struct GridArgs {
    /// Print the grid rows as JSON
    #[arg(long)]
    json: bool,
}

fn tag(offering: &Offering, selection: &Selection, config: &Config) -> String {
    let color = selection
        .color_index(&offering.unique_id)
        .and_then(|rank| config.color_for(rank));
    match color {
        Some(color) => format!("{}[{color}]", offering.unique_id),
        None => offering.unique_id.clone(),
    }
}

fn render_cell(projection: &BlockProjection, selection: &Selection, config: &Config) -> String {
    if let Some(full) = &projection.full {
        return tag(full, selection, config);
    }
    let half = |o: &Option<Offering>| o.as_ref().map(|o| tag(o, selection, config)).unwrap_or_else(|| ".".into());
    if projection.left.is_none() && projection.right.is_none() {
        return String::new();
    }
    format!("{} | {}", half(&projection.left), half(&projection.right))
}

fn render(rows: &[GridRow], selection: &Selection, config: &Config) -> String {
    let mut out = format!("{:<4}", "");
    for raw in TWO_HOUR_SLOTS {
        out.push_str(&format!("{:<CELL_WIDTH$}", SlotLabel::new(raw).display_label()));
    }
    out.push('\n');

    for row in rows {
        let empty = row.cells.iter().all(|c| c.projection.is_empty());
        if empty && !config.grid.show_empty {
            continue;
        }
        out.push_str(&format!("{:<4}", row.day.short()));
        for cell in &row.cells {
            out.push_str(&format!(
                "{:<CELL_WIDTH$}",
                render_cell(&cell.projection, selection, config)
            ));
        }
        out.push('\n');
    }
    out
}

pub fn run(args: GridArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_, session) = load_session()?;
    let rows = session.grid();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    let config = Config::load_or_default();
    print!("{}", render(&rows, session.selection(), &config));
    println!("total credits: {}", session.selection().total_credits());
    Ok(())
}

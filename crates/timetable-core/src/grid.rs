//! Day x block timetable grid.
//!
//! Each two-hour display block holds either one offering across the whole
//! block or up to two one-hour offerings in its left and right halves.

use serde::{Deserialize, Serialize};

use crate::offering::Offering;
use crate::slot::{overlaps, SlotLabel, Weekday, TWO_HOUR_SLOTS};

/// What occupies one two-hour cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockProjection {
    pub full: Option<Offering>,
    pub left: Option<Offering>,
    pub right: Option<Offering>,
}

impl BlockProjection {
    pub fn is_empty(&self) -> bool {
        self.full.is_none() && self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub block: SlotLabel,
    pub projection: BlockProjection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub day: Weekday,
    pub cells: Vec<GridCell>,
}

fn place(cell: &mut Option<Offering>, offering: &Offering, day: Weekday, block: &SlotLabel, half: &str) {
    if let Some(previous) = cell.as_ref() {
        if previous.unique_id != offering.unique_id {
            tracing::warn!(
                %day,
                %block,
                half,
                replaced = %previous.unique_id,
                by = %offering.unique_id,
                "grid cell already occupied, keeping the later offering"
            );
        }
    }
    *cell = Some(offering.clone());
}

/// Project `selected` onto one `(day, block)` cell.
///
/// A two-hour slot fills `full` only when its label equals `block`. A
/// one-hour slot lands in whichever half it overlaps. When two offerings
/// claim the same position the later one in selection order is kept.
pub fn project_block(day: Weekday, block: &SlotLabel, selected: &[Offering]) -> BlockProjection {
    let mut projection = BlockProjection::default();
    let halves = block.expand_to_hour_slots();
    let (left_half, right_half) = match halves.as_slice() {
        [left, right] => (left, right),
        _ => {
            tracing::debug!(%block, "not a two-hour block, nothing projected");
            return projection;
        }
    };

    for offering in selected {
        for slot in offering.slots_on(day) {
            match slot.time.duration() {
                2 if slot.time == *block => {
                    place(&mut projection.full, offering, day, block, "full");
                }
                1 => {
                    if overlaps(&slot.time, left_half) {
                        place(&mut projection.left, offering, day, block, "left");
                    }
                    if overlaps(&slot.time, right_half) {
                        place(&mut projection.right, offering, day, block, "right");
                    }
                }
                _ => {}
            }
        }
    }
    projection
}

/// The whole week over the standard two-hour blocks.
pub fn project_week(selected: &[Offering]) -> Vec<GridRow> {
    Weekday::ALL
        .iter()
        .map(|&day| GridRow {
            day,
            cells: TWO_HOUR_SLOTS
                .iter()
                .map(|raw| {
                    let block = SlotLabel::new(*raw);
                    let projection = project_block(day, &block, selected);
                    GridCell { block, projection }
                })
                .collect(),
        })
        .collect()
}

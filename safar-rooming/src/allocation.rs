use safar_domain::{PaxCounts, RoomType};
use serde::Serialize;

use crate::RoomingError;

/// Rooms needed for one requested room type
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RoomLine {
    pub room_type: RoomType,
    pub pax: u32,
    pub rooms: u32,
    /// One occupant of the last double room has no companion in the party
    /// and will be paired by operations staff
    pub unpaired: bool,
}

/// Result of binning passenger counts into rooms. Derived, never persisted
/// on its own; recomputed from a booking's pax snapshot whenever needed.
#[derive(Debug, Clone, Serialize)]
pub struct RoomingPlan {
    lines: Vec<RoomLine>,
    total_pax: u32,
}

impl RoomingPlan {
    pub fn lines(&self) -> &[RoomLine] {
        &self.lines
    }

    pub fn total_pax(&self) -> u32 {
        self.total_pax
    }

    pub fn total_rooms(&self) -> u32 {
        self.lines.iter().map(|line| line.rooms).sum()
    }

    /// One display string per room type with non-zero pax, in the fixed
    /// Quad, Triple, Double, Single order
    pub fn summary_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| {
                let rooms_word = if line.rooms == 1 { "room" } else { "rooms" };
                let mut summary = format!(
                    "{}: {} pax, {} {}",
                    line.room_type, line.pax, line.rooms, rooms_word
                );
                if line.unpaired {
                    summary.push_str(", 1 guest to be paired by staff");
                }
                summary
            })
            .collect()
    }
}

/// Bin-pack passenger counts into rooms.
///
/// Per type, `rooms = ceil(pax / capacity)`. Double is the only type whose
/// remainder of 1 is ambiguous (Quad and Triple remainders still fill a
/// room of their own; Single maps 1:1), so a leftover double occupant is
/// flagged rather than resolved here.
///
/// Pure: identical input yields identical output regardless of call order.
pub fn plan_rooms(pax: &PaxCounts) -> Result<RoomingPlan, RoomingError> {
    let total_pax = pax.total();
    if total_pax == 0 {
        return Err(RoomingError::InvalidAllocation(
            "at least one passenger is required".to_string(),
        ));
    }

    let mut lines = Vec::new();
    for room_type in RoomType::ALL {
        let count = pax.count_for(room_type);
        if count == 0 {
            continue;
        }

        let capacity = room_type.capacity();
        let rooms = (count + capacity - 1) / capacity;
        let unpaired = room_type == RoomType::Double && count % 2 == 1;

        lines.push(RoomLine {
            room_type,
            pax: count,
            rooms,
            unpaired,
        });
    }

    Ok(RoomingPlan { lines, total_pax })
}

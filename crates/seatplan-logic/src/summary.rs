//! Read-only aggregates over an allocation result.
//!
//! Renderers (seat charts, spreadsheets, printouts) need counts and the list
//! of same-subject neighbors; none of that is stored on the result itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AllocationResult, RoomPlacement, SeatRef};

/// Occupancy of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub room_name: String,
    pub capacity: usize,
    pub occupied: usize,
    pub empty: usize,
}

/// Whole-result aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummary {
    pub rooms: Vec<RoomSummary>,
    /// Seated examinees per subject code.
    pub seated_by_subject: BTreeMap<String, usize>,
    pub total_seated: usize,
    pub total_unallocated: usize,
    /// Adjacent same-subject pairs across all rooms.
    pub adjacency_conflicts: usize,
}

/// Compute occupancy and conflict counts for `result`.
pub fn summarize(result: &AllocationResult) -> AllocationSummary {
    let rooms: Vec<RoomSummary> = result
        .placements
        .iter()
        .map(|p| {
            let capacity: usize = p.seats.iter().map(Vec::len).sum();
            let occupied = p.occupied_count();
            RoomSummary {
                room_id: p.room_id.clone(),
                room_name: p.room_name.clone(),
                capacity,
                occupied,
                empty: capacity - occupied,
            }
        })
        .collect();

    let mut seated_by_subject = BTreeMap::new();
    for entry in result.seated() {
        *seated_by_subject
            .entry(entry.examinee.subject.clone())
            .or_insert(0) += 1;
    }

    AllocationSummary {
        total_seated: rooms.iter().map(|r| r.occupied).sum(),
        total_unallocated: result.unallocated_examinees.len(),
        adjacency_conflicts: conflicting_pairs(result).len(),
        rooms,
        seated_by_subject,
    }
}

/// Every pair of orthogonally or diagonally adjacent seats holding the same
/// subject. Each pair is reported once, earlier seat (row-major) first.
pub fn conflicting_pairs(result: &AllocationResult) -> Vec<(SeatRef, SeatRef)> {
    result
        .placements
        .iter()
        .enumerate()
        .flat_map(|(room_index, placement)| room_conflicts(room_index, placement))
        .collect()
}

fn room_conflicts(room_index: usize, placement: &RoomPlacement) -> Vec<(SeatRef, SeatRef)> {
    let at = |row: usize, col: usize| SeatRef {
        room_index,
        row,
        col,
    };
    let subject_at = |row: usize, col: usize| placement.seat(row, col).and_then(|s| s.subject());

    let mut pairs = Vec::new();
    for (r, row) in placement.seats.iter().enumerate() {
        for (c, seat) in row.iter().enumerate() {
            let Some(subject) = seat.subject() else {
                continue;
            };
            // Later neighbors only: right, down-left, down, down-right.
            let mut later = vec![(r, c + 1), (r + 1, c), (r + 1, c + 1)];
            if c > 0 {
                later.push((r + 1, c - 1));
            }
            for (nr, nc) in later {
                if subject_at(nr, nc) == Some(subject) {
                    pairs.push((at(r, c), at(nr, nc)));
                }
            }
        }
    }
    pairs
}

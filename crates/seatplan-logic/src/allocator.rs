//! Seat allocation — greedy room-by-room filling with subject adjacency checks.
//!
//! Given an exam session, an ordered list of rooms, and the full examinee
//! population, this module:
//! - filters to examinees whose subject is in the session,
//! - shuffles them with the caller's random source,
//! - buckets them into per-subject queues,
//! - fills each room row-major, preferring the subject with the most
//!   examinees left that does not collide with an already-seated neighbor
//!   (up, left, up-left, up-right),
//! - reports whoever is left as unallocated.
//!
//! The pass is single and greedy: seats are never revisited. When no subject
//! fits a usable seat, the default policy seats the largest remaining subject
//! anyway so capacity is not wasted; spacing mode and
//! [`AdjacencyPolicy::Strict`](crate::options::AdjacencyPolicy::Strict)
//! leave the seat empty instead.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{AllocationResult, ExamSession, Examinee, Room, RoomPlacement, Seat, SeatRef};
use crate::options::AllocationOptions;
use crate::queues::SubjectQueues;

/// Allocate seats, stamping the result with the current wall-clock time.
pub fn allocate<R: Rng + ?Sized>(
    session: &ExamSession,
    rooms: &[Room],
    examinees: &[Examinee],
    options: &AllocationOptions,
    rng: &mut R,
) -> AllocationResult {
    allocate_at(session, rooms, examinees, options, rng, now_millis())
}

/// Allocate seats using a `StdRng` seeded with `seed`.
///
/// Identical inputs and seed give identical seat contents.
pub fn allocate_seeded(
    session: &ExamSession,
    rooms: &[Room],
    examinees: &[Examinee],
    options: &AllocationOptions,
    seed: u64,
) -> AllocationResult {
    let mut rng = StdRng::seed_from_u64(seed);
    allocate(session, rooms, examinees, options, &mut rng)
}

/// Allocate seats with an explicit creation timestamp (Unix milliseconds).
pub fn allocate_at<R: Rng + ?Sized>(
    session: &ExamSession,
    rooms: &[Room],
    examinees: &[Examinee],
    options: &AllocationOptions,
    rng: &mut R,
    timestamp_ms: u64,
) -> AllocationResult {
    let mut eligible: Vec<Examinee> = examinees
        .iter()
        .filter(|e| session.includes(&e.subject))
        .cloned()
        .collect();
    eligible.shuffle(rng);
    let eligible_count = eligible.len();

    let mut queues = SubjectQueues::from_ordered(&session.subjects, eligible);
    let mut forced = Vec::new();

    let placements: Vec<RoomPlacement> = rooms
        .iter()
        .enumerate()
        .map(|(room_index, room)| {
            let placement = fill_room(room, room_index, &mut queues, options, &mut forced);
            log::debug!(
                "Room {} ({}): {}/{} seats filled, {} examinees waiting",
                room.id,
                room.name,
                placement.occupied_count(),
                room.capacity(),
                queues.total_remaining()
            );
            placement
        })
        .collect();

    let unallocated_examinees = queues.into_leftovers();

    log::info!(
        "Allocated exam {}: {} eligible, {} seated in {} rooms, {} unallocated, {} forced",
        session.id,
        eligible_count,
        eligible_count - unallocated_examinees.len(),
        placements.len(),
        unallocated_examinees.len(),
        forced.len()
    );

    AllocationResult {
        id: format!("alloc-{timestamp_ms}"),
        exam_id: session.id.clone(),
        timestamp: timestamp_ms,
        placements,
        unallocated_examinees,
        forced_placements: forced,
    }
}

/// Fill one room's grid in row-major order.
fn fill_room(
    room: &Room,
    room_index: usize,
    queues: &mut SubjectQueues,
    options: &AllocationOptions,
    forced: &mut Vec<SeatRef>,
) -> RoomPlacement {
    if room.is_malformed() {
        log::warn!(
            "Room {} has invalid dimensions {}x{}, treating as {}x{}",
            room.id,
            room.rows,
            room.columns,
            room.grid_rows(),
            room.grid_columns()
        );
    }

    let rows = room.grid_rows();
    let cols = room.grid_columns();
    let mut seats: Vec<Vec<Seat>> = (0..rows)
        .map(|r| (0..cols).map(|c| Seat::empty(r, c)).collect())
        .collect();
    // Subject queue index of each occupant, parallel to `seats`.
    let mut subjects: Vec<Vec<Option<usize>>> = vec![vec![None; cols]; rows];

    for r in 0..rows {
        for c in 0..cols {
            if queues.is_exhausted() {
                break;
            }
            if options.is_masked(r, c) {
                continue;
            }

            let candidates = queues.candidates();
            let choice = candidates
                .iter()
                .copied()
                .find(|&s| !conflicts(&subjects, r, c, s));

            let subject = match (choice, candidates.first()) {
                (Some(s), _) => s,
                (None, Some(&s)) if options.allows_fallback() => {
                    log::debug!(
                        "Room {} seat ({}, {}): no conflict-free subject, seating {}",
                        room.id,
                        r,
                        c,
                        queues.subject(s)
                    );
                    forced.push(SeatRef {
                        room_index,
                        row: r,
                        col: c,
                    });
                    s
                }
                _ => continue,
            };

            if let Some(examinee) = queues.pop(subject) {
                seats[r][c].examinee = Some(examinee);
                subjects[r][c] = Some(subject);
            }
        }
    }

    RoomPlacement {
        room_id: room.id.clone(),
        room_name: room.name.clone(),
        seats,
    }
}

/// Whether `subject` at `(r, c)` matches any already-filled neighbor:
/// up, left, up-left, or up-right.
fn conflicts(grid: &[Vec<Option<usize>>], r: usize, c: usize, subject: usize) -> bool {
    let same = |row: usize, col: usize| {
        grid.get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .flatten()
            == Some(subject)
    };

    if r > 0 && (same(r - 1, c) || same(r - 1, c + 1)) {
        return true;
    }
    if c > 0 && same(r, c - 1) {
        return true;
    }
    r > 0 && c > 0 && same(r - 1, c - 1)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

//! Record checks and post-hoc audits for seat allocations.
//!
//! The allocator itself accepts anything. These are pure functions the record
//! store can run before saving a room or roster, and that tests and the
//! harness run against a finished result. Nothing here panics; every finding
//! comes back as a [`ValidationError`].

use std::collections::{HashMap, HashSet};

use crate::model::{AllocationResult, ExamSession, Examinee, Room};
use crate::options::AllocationOptions;

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// True if any finding is an error (warnings alone pass).
pub fn has_errors(findings: &[ValidationError]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

fn warning(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Warning,
        message,
    }
}

// ── A. Input records ────────────────────────────────────────────────────

/// Rooms must have positive dimensions, unique ids, and a name.
pub fn check_rooms(rooms: &[Room]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for room in rooms {
        if room.rows <= 0 || room.columns <= 0 {
            errors.push(error(
                "room",
                format!(
                    "Room {} has non-positive dimensions: {}×{}",
                    room.id, room.rows, room.columns
                ),
            ));
        }
        if !seen.insert(room.id.as_str()) {
            errors.push(error("room", format!("Duplicate room id {}", room.id)));
        }
        if room.name.trim().is_empty() {
            errors.push(warning("room", format!("Room {} has no name", room.id)));
        }
    }
    errors
}

/// A session should list at least one subject, each once.
pub fn check_session(session: &ExamSession) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if session.subjects.is_empty() {
        errors.push(warning(
            "session",
            format!("Exam {} has no subjects; nobody will be seated", session.id),
        ));
    }
    let mut seen = HashSet::new();
    for subject in &session.subjects {
        if !seen.insert(subject.as_str()) {
            errors.push(warning(
                "session",
                format!("Exam {} lists subject {} more than once", session.id, subject),
            ));
        }
    }
    errors
}

/// Examinees need unique ids and a subject; roll numbers should be unique.
pub fn check_examinees(examinees: &[Examinee]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();
    let mut rolls = HashSet::new();
    for e in examinees {
        if !ids.insert(e.id.as_str()) {
            errors.push(error("examinee", format!("Duplicate examinee id {}", e.id)));
        }
        if !e.roll_no.is_empty() && !rolls.insert(e.roll_no.as_str()) {
            errors.push(warning(
                "examinee",
                format!("Roll number {} is shared by more than one examinee", e.roll_no),
            ));
        }
        if e.subject.trim().is_empty() {
            errors.push(error(
                "examinee",
                format!("Examinee {} has no subject", e.id),
            ));
        }
    }
    errors
}

// ── B. Allocation results ───────────────────────────────────────────────

/// Audit `result` against the inputs it was produced from.
///
/// Checks grid shape per room, seat coordinates, the spacing mask, that
/// forced placements point at occupied seats, and that seated plus
/// unallocated examinees are exactly the eligible population.
pub fn audit_result(
    result: &AllocationResult,
    session: &ExamSession,
    rooms: &[Room],
    examinees: &[Examinee],
    options: &AllocationOptions,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    errors.extend(check_grids(result, rooms, options));
    errors.extend(check_forced(result));
    errors.extend(check_conservation(result, session, examinees));
    errors
}

fn check_grids(
    result: &AllocationResult,
    rooms: &[Room],
    options: &AllocationOptions,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if result.placements.len() != rooms.len() {
        errors.push(error(
            "grid",
            format!(
                "{} placements for {} rooms",
                result.placements.len(),
                rooms.len()
            ),
        ));
    }

    for (placement, room) in result.placements.iter().zip(rooms) {
        if placement.room_id != room.id {
            errors.push(error(
                "grid",
                format!("Placement {} out of order, expected {}", placement.room_id, room.id),
            ));
        }
        let rows_ok = placement.seats.len() == room.grid_rows();
        let cols_ok = placement
            .seats
            .iter()
            .all(|row| row.len() == room.grid_columns());
        if !rows_ok || !cols_ok {
            errors.push(error(
                "grid",
                format!(
                    "Room {} grid is not {}×{}",
                    room.id,
                    room.grid_rows(),
                    room.grid_columns()
                ),
            ));
        }

        for (r, row) in placement.seats.iter().enumerate() {
            for (c, seat) in row.iter().enumerate() {
                if seat.row != r || seat.col != c {
                    errors.push(error(
                        "grid",
                        format!(
                            "Room {} seat at [{}][{}] claims ({}, {})",
                            room.id, r, c, seat.row, seat.col
                        ),
                    ));
                }
                if options.is_masked(r, c) && !seat.is_empty() {
                    errors.push(error(
                        "spacing",
                        format!("Room {} seat ({}, {}) should be left empty", room.id, r, c),
                    ));
                }
            }
        }
    }
    errors
}

fn check_forced(result: &AllocationResult) -> Vec<ValidationError> {
    result
        .forced_placements
        .iter()
        .filter(|seat| {
            result
                .placements
                .get(seat.room_index)
                .and_then(|p| p.seat(seat.row, seat.col))
                .map_or(true, |s| s.is_empty())
        })
        .map(|seat| {
            error(
                "forced",
                format!(
                    "Forced placement at room {} ({}, {}) is not an occupied seat",
                    seat.room_index, seat.row, seat.col
                ),
            )
        })
        .collect()
}

fn check_conservation(
    result: &AllocationResult,
    session: &ExamSession,
    examinees: &[Examinee],
) -> Vec<ValidationError> {
    let mut expected: HashMap<&str, usize> = HashMap::new();
    for e in examinees.iter().filter(|e| session.includes(&e.subject)) {
        *expected.entry(e.id.as_str()).or_insert(0) += 1;
    }

    let mut actual: HashMap<&str, usize> = HashMap::new();
    let accounted = result
        .seated()
        .map(|s| s.examinee)
        .chain(result.unallocated_examinees.iter());
    for e in accounted {
        *actual.entry(e.id.as_str()).or_insert(0) += 1;
    }

    let mut errors = Vec::new();
    for (id, &want) in &expected {
        let got = actual.get(id).copied().unwrap_or(0);
        if got != want {
            errors.push(error(
                "conservation",
                format!("Examinee {} accounted for {} times, expected {}", id, got, want),
            ));
        }
    }
    for id in actual.keys().filter(|id| !expected.contains_key(*id)) {
        errors.push(error(
            "conservation",
            format!("Examinee {} is not in the eligible population", id),
        ));
    }
    errors
}

//! Seating data model: examinees, rooms, sessions, and allocation output.
//!
//! Everything here is plain data. Inputs are read-only to the allocator and
//! the output value is owned by the caller, who decides how to persist or
//! render it.

use serde::{Deserialize, Serialize};

/// A person to be seated, tagged with exactly one subject for the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Examinee {
    /// Opaque identity assigned by the record store.
    pub id: String,
    pub roll_no: String,
    pub name: String,
    pub department: String,
    /// Subject code this examinee sits for.
    pub subject: String,
}

impl Examinee {
    pub fn new(
        id: impl Into<String>,
        roll_no: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            roll_no: roll_no.into(),
            name: name.into(),
            department: department.into(),
            subject: subject.into(),
        }
    }
}

/// An exam room laid out as a rows × columns grid of seats.
///
/// Dimensions are signed so that a misbehaving caller's negative values can
/// still be represented; the allocator treats anything below zero as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub rows: i64,
    pub columns: i64,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rows: i64, columns: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rows,
            columns,
        }
    }

    /// Row count clamped to zero.
    pub fn grid_rows(&self) -> usize {
        clamp_dimension(self.rows)
    }

    /// Column count clamped to zero.
    pub fn grid_columns(&self) -> usize {
        clamp_dimension(self.columns)
    }

    /// Number of seats in the (clamped) grid.
    pub fn capacity(&self) -> usize {
        self.grid_rows() * self.grid_columns()
    }

    /// True if either dimension is negative.
    pub fn is_malformed(&self) -> bool {
        self.rows < 0 || self.columns < 0
    }
}

fn clamp_dimension(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}

/// One exam sitting and the subject codes in scope for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSession {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Scheduled date as entered by the record store (free-form).
    #[serde(default)]
    pub date: String,
    pub subjects: Vec<String>,
}

impl ExamSession {
    pub fn new<S: Into<String>>(id: impl Into<String>, subjects: impl IntoIterator<Item = S>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            date: String::new(),
            subjects: subjects.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>, date: impl Into<String>) -> Self {
        self.name = name.into();
        self.date = date.into();
        self
    }

    /// Whether `subject` is in scope for this session.
    pub fn includes(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }
}

/// A single seat in a room grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub row: usize,
    pub col: usize,
    pub examinee: Option<Examinee>,
}

impl Seat {
    pub fn empty(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            examinee: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.examinee.is_none()
    }

    pub fn subject(&self) -> Option<&str> {
        self.examinee.as_ref().map(|e| e.subject.as_str())
    }
}

/// A room paired with its fully realized seat grid, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPlacement {
    pub room_id: String,
    pub room_name: String,
    pub seats: Vec<Vec<Seat>>,
}

impl RoomPlacement {
    pub fn rows(&self) -> usize {
        self.seats.len()
    }

    pub fn columns(&self) -> usize {
        self.seats.first().map_or(0, Vec::len)
    }

    pub fn seat(&self, row: usize, col: usize) -> Option<&Seat> {
        self.seats.get(row).and_then(|r| r.get(col))
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().flatten().filter(|s| !s.is_empty()).count()
    }
}

/// Location of a seat within an allocation: room index plus grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRef {
    pub room_index: usize,
    pub row: usize,
    pub col: usize,
}

/// Output of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub id: String,
    pub exam_id: String,
    /// Creation time, Unix milliseconds.
    pub timestamp: u64,
    /// One entry per input room, in input order.
    pub placements: Vec<RoomPlacement>,
    /// Eligible examinees that did not get a seat.
    pub unallocated_examinees: Vec<Examinee>,
    /// Seats filled by the capacity fallback despite an adjacency conflict.
    #[serde(default)]
    pub forced_placements: Vec<SeatRef>,
}

/// A seated examinee with display coordinates (1-based row/column).
#[derive(Debug, Clone, Copy)]
pub struct SeatedEntry<'a> {
    pub room_id: &'a str,
    pub room_name: &'a str,
    pub row: usize,
    pub col: usize,
    pub examinee: &'a Examinee,
}

impl AllocationResult {
    /// All occupied seats in room order, row-major within each room.
    pub fn seated(&self) -> impl Iterator<Item = SeatedEntry<'_>> + '_ {
        self.placements.iter().flat_map(|placement| {
            placement.seats.iter().flatten().filter_map(move |seat| {
                seat.examinee.as_ref().map(|examinee| SeatedEntry {
                    room_id: &placement.room_id,
                    room_name: &placement.room_name,
                    row: seat.row + 1,
                    col: seat.col + 1,
                    examinee,
                })
            })
        })
    }

    pub fn allocated_count(&self) -> usize {
        self.placements.iter().map(RoomPlacement::occupied_count).sum()
    }

    pub fn unallocated_count(&self) -> usize {
        self.unallocated_examinees.len()
    }

    /// Look up where an examinee was seated, if anywhere.
    pub fn find_seat(&self, examinee_id: &str) -> Option<SeatRef> {
        self.placements
            .iter()
            .enumerate()
            .find_map(|(room_index, placement)| {
                placement.seats.iter().flatten().find_map(|seat| {
                    seat.examinee
                        .as_ref()
                        .filter(|e| e.id == examinee_id)
                        .map(|_| SeatRef {
                            room_index,
                            row: seat.row,
                            col: seat.col,
                        })
                })
            })
    }
}

//! Options for a single allocation run.

use serde::{Deserialize, Serialize};

/// What to do with a usable seat when every remaining subject would collide
/// with an already-seated neighbor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyPolicy {
    /// Seat the subject with the most examinees left anyway.
    #[default]
    PreferFill,
    /// Leave the seat empty.
    Strict,
}

/// Knobs for a single allocation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllocationOptions {
    /// Leave every seat with odd `row + col` empty (checkerboard).
    pub empty_seat_spacing: bool,
    pub adjacency: AdjacencyPolicy,
}

impl AllocationOptions {
    /// Checkerboard spacing with the default adjacency policy.
    pub fn spaced() -> Self {
        Self {
            empty_seat_spacing: true,
            ..Self::default()
        }
    }

    /// No spacing, never accept an adjacency conflict.
    pub fn strict() -> Self {
        Self {
            adjacency: AdjacencyPolicy::Strict,
            ..Self::default()
        }
    }

    /// Whether the seat at `(row, col)` is masked out by spacing.
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.empty_seat_spacing && (row + col) % 2 != 0
    }

    /// Whether a conflicting placement may be accepted to avoid an empty seat.
    ///
    /// Spacing mode never relaxes, regardless of policy.
    pub fn allows_fallback(&self) -> bool {
        !self.empty_seat_spacing && self.adjacency == AdjacencyPolicy::PreferFill
    }
}

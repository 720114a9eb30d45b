//! Pure exam seating logic for SeatPlan.
//!
//! This crate contains the seat allocation algorithm and the data it works
//! on, independent of any record store, UI, or export format. Functions take
//! plain data and return results, making them unit-testable and usable from
//! a web backend, a native CLI, or the headless harness alike.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`allocator`] | Greedy room-by-room seat filling with subject adjacency checks |
//! | [`model`] | Examinees, rooms, exam sessions, seat grids, allocation results |
//! | [`options`] | Spacing mode and adjacency strictness |
//! | [`queues`] | Per-subject remaining-supply queues with O(1) pop |
//! | [`request`] | Self-contained allocation request, loadable from JSON |
//! | [`summary`] | Read-only aggregates over a result (occupancy, conflicts) |
//! | [`validation`] | Record checks for callers and post-hoc result audits |
//!
//! ```
//! use seatplan_logic::allocator::allocate_seeded;
//! use seatplan_logic::model::{ExamSession, Examinee, Room};
//! use seatplan_logic::options::AllocationOptions;
//!
//! let session = ExamSession::new("exam-1", ["MATH", "PHYS"]);
//! let rooms = vec![Room::new("hall-a", "Hall A", 2, 3)];
//! let examinees: Vec<Examinee> = (0..6)
//!     .map(|i| {
//!         let subject = if i % 2 == 0 { "MATH" } else { "PHYS" };
//!         Examinee::new(format!("s{i}"), format!("R{i:03}"), format!("Student {i}"), "CS", subject)
//!     })
//!     .collect();
//!
//! let result = allocate_seeded(&session, &rooms, &examinees, &AllocationOptions::default(), 7);
//! assert_eq!(result.allocated_count(), 6);
//! assert!(result.unallocated_examinees.is_empty());
//! ```

pub mod allocator;
pub mod model;
pub mod options;
pub mod queues;
pub mod request;
pub mod summary;
pub mod validation;

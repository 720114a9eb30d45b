//! Self-contained allocation request.
//!
//! Bundles everything one run needs so a host (or the harness) can hand the
//! allocator a single JSON document:
//!
//! ```json
//! {
//!   "session": { "id": "mid-2024", "subjects": ["MATH", "PHYS"] },
//!   "rooms": [{ "id": "h1", "name": "Hall 1", "rows": 5, "columns": 6 }],
//!   "examinees": [{ "id": "s1", "rollNo": "001", "name": "Ada",
//!                   "department": "CS", "subject": "MATH" }],
//!   "options": { "emptySeatSpacing": false },
//!   "seed": 42
//! }
//! ```

use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::allocator::allocate;
use crate::model::{AllocationResult, ExamSession, Examinee, Room};
use crate::options::AllocationOptions;
use crate::validation::{check_examinees, check_rooms, check_session, ValidationError};

/// Inputs for one allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub session: ExamSession,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub examinees: Vec<Examinee>,
    #[serde(default)]
    pub options: AllocationOptions,
    /// Fixed seed for a reproducible run (None = fresh entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AllocationRequest {
    pub fn new(session: ExamSession, rooms: Vec<Room>, examinees: Vec<Examinee>) -> Self {
        Self {
            session,
            rooms,
            examinees,
            options: AllocationOptions::default(),
            seed: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RequestError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Record-level findings for the bundled inputs.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut findings = check_session(&self.session);
        findings.extend(check_rooms(&self.rooms));
        findings.extend(check_examinees(&self.examinees));
        findings
    }

    /// Run the allocation with the request's seed, or fresh entropy if none.
    pub fn run(&self) -> AllocationResult {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        allocate(
            &self.session,
            &self.rooms,
            &self.examinees,
            &self.options,
            &mut rng,
        )
    }
}

/// Errors that can occur while loading a request
#[derive(Debug)]
pub enum RequestError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for RequestError {
    fn from(e: std::io::Error) -> Self {
        RequestError::Io(e)
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(e: serde_json::Error) -> Self {
        RequestError::Json(e)
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Io(e) => write!(f, "IO error: {}", e),
            RequestError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Io(e) => Some(e),
            RequestError::Json(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST_JSON: &str = r#"{
        "session": { "id": "mid", "name": "Midterm", "date": "2024-03-01", "subjects": ["MATH", "PHYS"] },
        "rooms": [
            { "id": "h1", "name": "Hall 1", "rows": 2, "columns": 2 },
            { "id": "h2", "name": "Hall 2", "rows": 1, "columns": 3 }
        ],
        "examinees": [
            { "id": "1", "rollNo": "001", "name": "Ada", "department": "CS", "subject": "MATH" },
            { "id": "2", "rollNo": "002", "name": "Bo", "department": "EE", "subject": "PHYS" },
            { "id": "3", "rollNo": "003", "name": "Cy", "department": "CS", "subject": "MATH" },
            { "id": "4", "rollNo": "004", "name": "Di", "department": "ME", "subject": "CHEM" }
        ],
        "seed": 5
    }"#;

    #[test]
    fn test_parse_and_run() {
        let request = AllocationRequest::from_json_str(REQUEST_JSON).unwrap();
        assert_eq!(request.session.name, "Midterm");
        assert_eq!(request.rooms.len(), 2);
        assert_eq!(request.options, AllocationOptions::default());
        assert!(request.validate().is_empty());

        let result = request.run();
        assert_eq!(result.exam_id, "mid");
        assert_eq!(result.placements.len(), 2);
        assert_eq!(result.allocated_count(), 3);
        assert!(result.unallocated_examinees.is_empty());
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let request = AllocationRequest::from_json_str(REQUEST_JSON).unwrap();
        assert_eq!(request.run().placements, request.run().placements);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let err = AllocationRequest::from_json_str("{\"rooms\": []}").unwrap_err();
        assert!(matches!(err, RequestError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AllocationRequest::from_path("/nonexistent/seatplan/request.json").unwrap_err();
        assert!(matches!(err, RequestError::Io(_)));
    }

    #[test]
    fn test_result_serializes() {
        let request = AllocationRequest::from_json_str(REQUEST_JSON).unwrap();
        let result = request.run();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"unallocatedExaminees\""));
        let back: AllocationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}

//! SeatPlan Headless Allocation Harness
//!
//! Sweeps seeded synthetic scenarios through the allocator and checks the
//! placement properties every result must satisfy. Runs entirely
//! in-process, with no storage and no rendering.
//!
//! Usage:
//!   cargo run -p seatplan-simtest
//!   cargo run -p seatplan-simtest -- --verbose --seeds 200
//!   cargo run -p seatplan-simtest -- --input request.json
//!
//! Set `RUST_LOG=debug` to see per-room allocator logging.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seatplan_logic::allocator::{allocate_at, allocate_seeded};
use seatplan_logic::model::{ExamSession, Examinee, Room};
use seatplan_logic::options::{AdjacencyPolicy, AllocationOptions};
use seatplan_logic::request::AllocationRequest;
use seatplan_logic::summary::{conflicting_pairs, summarize};
use seatplan_logic::validation::{audit_result, has_errors, Severity};

const DEFAULT_SEEDS: u64 = 64;
const SUBJECTS: [&str; 6] = ["MATH", "PHYS", "CHEM", "BIO", "HIST", "ECON"];

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Args {
    verbose: bool,
    seeds: u64,
    input: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        verbose: false,
        seeds: DEFAULT_SEEDS,
        input: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--verbose" => args.verbose = true,
            "--seeds" => {
                args.seeds = it
                    .next()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(DEFAULT_SEEDS)
            }
            "--input" => args.input = it.next(),
            other => log::warn!("Ignoring unknown argument {}", other),
        }
    }
    args
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = parse_args();

    if let Some(path) = &args.input {
        std::process::exit(run_request(path, args.verbose));
    }

    println!("=== SeatPlan Allocation Harness ===\n");

    let mut results = Vec::new();

    // 1. Fixed scenarios with known answers
    results.extend(validate_fixed_scenarios(args.verbose));

    // 2. Degenerate inputs
    results.extend(validate_degenerate_inputs(args.verbose));

    // 3. Seeded random sweep
    results.extend(validate_random_sweep(args.seeds, args.verbose));

    // 4. Determinism
    results.extend(validate_determinism(args.seeds));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Request file mode ───────────────────────────────────────────────────

fn run_request(path: &str, verbose: bool) -> i32 {
    let request = match AllocationRequest::from_path(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path, e);
            return 2;
        }
    };

    let findings = request.validate();
    for f in &findings {
        match f.severity {
            Severity::Error => log::error!("[{}] {}", f.category, f.message),
            Severity::Warning => log::warn!("[{}] {}", f.category, f.message),
        }
    }
    if has_errors(&findings) {
        eprintln!("{} invalid records, allocating anyway", findings.len());
    }

    let result = request.run();

    if verbose {
        let summary = summarize(&result);
        eprintln!("Exam {}:", result.exam_id);
        for room in &summary.rooms {
            eprintln!(
                "  {:20} {:4}/{:4} seated",
                room.room_name, room.occupied, room.capacity
            );
        }
        eprintln!(
            "  seated={} unallocated={} conflicts={} forced={}",
            summary.total_seated,
            summary.total_unallocated,
            summary.adjacency_conflicts,
            result.forced_placements.len()
        );
    }

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Failed to serialize result: {}", e);
            2
        }
    }
}

// ── Scenario helpers ────────────────────────────────────────────────────

fn make_roster(counts: &[(&str, usize)]) -> Vec<Examinee> {
    let mut roster = Vec::new();
    for &(subject, count) in counts {
        for i in 0..count {
            let n = roster.len();
            roster.push(Examinee::new(
                format!("{}-{}", subject, i),
                format!("{:05}", n),
                format!("Examinee {}", n),
                "General",
                subject,
            ));
        }
    }
    roster
}

struct Scenario {
    session: ExamSession,
    rooms: Vec<Room>,
    roster: Vec<Examinee>,
}

/// Random rooms (occasionally malformed) and a random roster that includes
/// some subjects outside the session.
fn random_scenario(rng: &mut StdRng) -> Scenario {
    let in_scope: usize = rng.gen_range(1..=4);
    let session = ExamSession::new("sweep", SUBJECTS[..in_scope].iter().copied());

    let rooms: Vec<Room> = (0..rng.gen_range(0..=4))
        .map(|i| {
            let (rows, cols) = match rng.gen_range(0..20) {
                0 => (0, rng.gen_range(1..6)),
                1 => (-rng.gen_range(1..4i64), rng.gen_range(1..6)),
                _ => (rng.gen_range(1..9), rng.gen_range(1..9)),
            };
            Room::new(format!("room-{}", i), format!("Room {}", i + 1), rows, cols)
        })
        .collect();

    let counts: Vec<(&str, usize)> = SUBJECTS
        .iter()
        .map(|&s| (s, rng.gen_range(0..40)))
        .collect();
    let roster = make_roster(&counts);

    Scenario {
        session,
        rooms,
        roster,
    }
}

fn option_variants() -> [AllocationOptions; 3] {
    [
        AllocationOptions::default(),
        AllocationOptions::spaced(),
        AllocationOptions {
            empty_seat_spacing: false,
            adjacency: AdjacencyPolicy::Strict,
        },
    ]
}

// ── 1. Fixed scenarios ──────────────────────────────────────────────────

fn validate_fixed_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Fixed Scenarios ---");
    let mut results = Vec::new();

    // Two subjects, three each, one 2×3 room
    let session = ExamSession::new("fixed", ["A", "B"]);
    let rooms = vec![Room::new("r", "Room", 2, 3)];
    let roster = make_roster(&[("A", 3), ("B", 3)]);
    let result = allocate_seeded(&session, &rooms, &roster, &AllocationOptions::default(), 1);
    let layout: Vec<String> = result.placements[0]
        .seats
        .iter()
        .map(|row| row.iter().map(|s| s.subject().unwrap_or(".")).collect())
        .collect();
    results.push(TestResult {
        name: "fixed_two_subjects_fill".into(),
        passed: result.allocated_count() == 6 && result.unallocated_examinees.is_empty(),
        detail: format!("layout {:?}", layout),
    });
    results.push(TestResult {
        name: "fixed_two_subjects_alternate".into(),
        passed: layout == ["ABA", "BAB"],
        detail: format!("{} forced placements", result.forced_placements.len()),
    });
    if verbose {
        for line in &layout {
            println!("    {}", line);
        }
    }

    // Single remaining subject: fallback fires only when nothing else fits
    let session = ExamSession::new("fixed", ["A", "B"]);
    let rooms = vec![Room::new("r", "Room", 1, 4)];
    let roster = make_roster(&[("A", 3), ("B", 1)]);
    let result = allocate_seeded(&session, &rooms, &roster, &AllocationOptions::default(), 1);
    let forced: Vec<_> = result
        .forced_placements
        .iter()
        .map(|s| (s.row, s.col))
        .collect();
    results.push(TestResult {
        name: "fixed_fallback_last_resort".into(),
        passed: forced == [(0, 3)],
        detail: format!("forced at {:?}", forced),
    });

    // Strict policy leaves the same seat empty
    let strict = AllocationOptions {
        empty_seat_spacing: false,
        adjacency: AdjacencyPolicy::Strict,
    };
    let result = allocate_seeded(&session, &rooms, &roster, &strict, 1);
    results.push(TestResult {
        name: "fixed_strict_leaves_empty".into(),
        passed: result.allocated_count() == 3 && result.unallocated_examinees.len() == 1,
        detail: format!(
            "{} seated, {} unallocated",
            result.allocated_count(),
            result.unallocated_examinees.len()
        ),
    });

    results
}

// ── 2. Degenerate inputs ────────────────────────────────────────────────

fn validate_degenerate_inputs(_verbose: bool) -> Vec<TestResult> {
    println!("--- Degenerate Inputs ---");
    let mut results = Vec::new();

    let session = ExamSession::new("degenerate", ["A", "B"]);
    let roster = make_roster(&[("A", 5), ("B", 4), ("Z", 3)]);

    let result = allocate_seeded(&session, &[], &roster, &AllocationOptions::default(), 0);
    results.push(TestResult {
        name: "no_rooms_all_unallocated".into(),
        passed: result.placements.is_empty() && result.unallocated_examinees.len() == 9,
        detail: format!("{} unallocated", result.unallocated_examinees.len()),
    });

    let rooms = vec![Room::new("r1", "One", 3, 3), Room::new("r2", "Two", 2, 5)];
    let result = allocate_seeded(&session, &rooms, &[], &AllocationOptions::default(), 0);
    results.push(TestResult {
        name: "no_examinees_all_empty".into(),
        passed: result.placements.len() == 2
            && result.allocated_count() == 0
            && result.unallocated_examinees.is_empty(),
        detail: format!("{} placements", result.placements.len()),
    });

    let empty_session = ExamSession::new("degenerate", Vec::<String>::new());
    let result = allocate_seeded(&empty_session, &rooms, &roster, &AllocationOptions::default(), 0);
    results.push(TestResult {
        name: "empty_session_nobody_eligible".into(),
        passed: result.allocated_count() == 0 && result.unallocated_examinees.is_empty(),
        detail: "no subjects in scope".into(),
    });

    let bad_rooms = vec![Room::new("neg", "Neg", -4, 3), Room::new("zero", "Zero", 0, 0)];
    let result = allocate_seeded(&session, &bad_rooms, &roster, &AllocationOptions::default(), 0);
    results.push(TestResult {
        name: "malformed_rooms_zero_capacity".into(),
        passed: result.placements.len() == 2
            && result.placements.iter().all(|p| p.rows() == 0)
            && result.unallocated_examinees.len() == 9,
        detail: "negative and zero dimensions clamp to empty grids".into(),
    });

    results
}

// ── 3. Random sweep ─────────────────────────────────────────────────────

fn validate_random_sweep(seeds: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Sweep ({} seeds) ---", seeds);
    let mut results = Vec::new();

    let mut audit_failures = Vec::new();
    let mut unforced_conflicts = 0usize;
    let mut capacity_mismatches = 0usize;
    let mut runs = 0usize;
    let mut seated_total = 0usize;
    let mut forced_total = 0usize;

    for seed in 0..seeds {
        let mut rng = StdRng::seed_from_u64(seed);
        let scenario = random_scenario(&mut rng);
        let eligible = scenario
            .roster
            .iter()
            .filter(|e| scenario.session.includes(&e.subject))
            .count();
        let capacity: usize = scenario.rooms.iter().map(Room::capacity).sum();

        for options in option_variants() {
            runs += 1;
            let result = allocate_at(
                &scenario.session,
                &scenario.rooms,
                &scenario.roster,
                &options,
                &mut rng,
                0,
            );
            seated_total += result.allocated_count();
            forced_total += result.forced_placements.len();

            let findings = audit_result(
                &result,
                &scenario.session,
                &scenario.rooms,
                &scenario.roster,
                &options,
            );
            if !findings.is_empty() {
                audit_failures.push(format!("seed {} {:?}: {}", seed, options, findings[0].message));
            }

            unforced_conflicts += conflicting_pairs(&result)
                .iter()
                .filter(|(_, later)| !result.forced_placements.contains(later))
                .count();

            if options == AllocationOptions::default() {
                let expected = eligible.saturating_sub(capacity);
                if result.unallocated_examinees.len() != expected {
                    capacity_mismatches += 1;
                }
            }
        }
    }

    if verbose {
        println!(
            "  {} runs, {} seated, {} forced placements",
            runs, seated_total, forced_total
        );
    }

    results.push(TestResult {
        name: "sweep_audit_clean".into(),
        passed: audit_failures.is_empty(),
        detail: audit_failures
            .first()
            .cloned()
            .unwrap_or_else(|| format!("{} runs audited", runs)),
    });
    results.push(TestResult {
        name: "sweep_conflicts_only_forced".into(),
        passed: unforced_conflicts == 0,
        detail: format!("{} conflicts without a forced placement", unforced_conflicts),
    });
    results.push(TestResult {
        name: "sweep_capacity_exhaustion".into(),
        passed: capacity_mismatches == 0,
        detail: format!(
            "{} runs with unallocated != max(0, eligible - capacity)",
            capacity_mismatches
        ),
    });

    results
}

// ── 4. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(seeds: u64) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut mismatches = 0usize;

    for seed in 0..seeds.min(16) {
        let mut rng = StdRng::seed_from_u64(seed);
        let scenario = random_scenario(&mut rng);
        for options in option_variants() {
            let a = allocate_seeded(
                &scenario.session,
                &scenario.rooms,
                &scenario.roster,
                &options,
                seed,
            );
            let b = allocate_seeded(
                &scenario.session,
                &scenario.rooms,
                &scenario.roster,
                &options,
                seed,
            );
            if a.placements != b.placements || a.unallocated_examinees != b.unallocated_examinees {
                mismatches += 1;
            }
        }
    }

    vec![TestResult {
        name: "same_seed_same_seating".into(),
        passed: mismatches == 0,
        detail: format!("{} mismatched reruns", mismatches),
    }]
}

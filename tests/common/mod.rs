//! Shared test infrastructure for the proposal list tests.
//!
//! # Fixtures
//! - `semesters_between()` - every semester of an inclusive range
//! - `proposal()` / `proposals_across()` - proposal list items
//! - `context_on()` - a list context pinned to a date

#![allow(dead_code)]

use webmanager::handlers::proposal_handlers::ListContext;
use webmanager::models::proposal::{
    Investigator, ProposalListItem, ProposalStatus, ProposalType, UserContext,
};
use webmanager::models::semester::{next_semester_of, FixedClock};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const PI_ID: i64 = 10;
pub const LIAISON_ID: i64 = 20;

const STATUSES: [ProposalStatus; 6] = [
    ProposalStatus::Active,
    ProposalStatus::Completed,
    ProposalStatus::Rejected,
    ProposalStatus::Expired,
    ProposalStatus::UnderTechnicalReview,
    ProposalStatus::UnderScientificReview,
];

const TYPES: [ProposalType; 3] = [
    ProposalType::Science,
    ProposalType::Commissioning,
    ProposalType::DirectorsDiscretionaryTime,
];

// ============================================================================
// FIXTURES
// ============================================================================

/// Every semester from `start` to `end`, both included.
pub fn semesters_between(start: &str, end: &str) -> Vec<String> {
    let mut out = vec![start.to_string()];
    while out.last().map(String::as_str) != Some(end) {
        let next = next_semester_of(out.last().expect("non-empty")).expect("valid semester");
        out.push(next);
    }
    out
}

pub fn investigator(id: i64, family_name: &str) -> Investigator {
    Investigator {
        id,
        given_name: "Test".to_string(),
        family_name: family_name.to_string(),
    }
}

/// An active science proposal by `PI_ID` without a liaison astronomer.
pub fn proposal(code: &str, semester: &str) -> ProposalListItem {
    ProposalListItem {
        proposal_code: code.to_string(),
        title: format!("Observations for {code}"),
        semester: semester.to_string(),
        status: ProposalStatus::Active,
        proposal_type: ProposalType::Science,
        phase: 1,
        principal_investigator: investigator(PI_ID, "Principal"),
        liaison_astronomer: None,
    }
}

/// `n` proposals cycling through `semesters`, statuses, types and phases.
/// Every fourth proposal has `LIAISON_ID` as liaison astronomer.
pub fn proposals_across(n: usize, semesters: &[String]) -> Vec<ProposalListItem> {
    (0..n)
        .map(|i| {
            let semester = &semesters[i % semesters.len()];
            let mut p = proposal(&format!("{semester}-P{i:04}"), semester);
            p.status = STATUSES[i % STATUSES.len()];
            p.proposal_type = TYPES[i % TYPES.len()];
            p.phase = if i % 2 == 0 { 1 } else { 2 };
            if i % 4 == 0 {
                p.liaison_astronomer = Some(investigator(LIAISON_ID, "Liaison"));
            }
            p
        })
        .collect()
}

pub fn context_on(year: i32, month: u32, day: u32, user: UserContext) -> ListContext {
    let clock = FixedClock::on(year, month, day).expect("valid date");
    ListContext::new(user, &clock)
}

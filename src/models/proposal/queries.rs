use std::cmp::Ordering;
use std::future::Future;

use super::types::ProposalListItem;
use crate::errors::AppResult;

/// Supplies proposals for an inclusive semester range, latest first.
pub trait ProposalSource: Send + Sync {
    /// At most `limit` proposals with `start <= semester <= end`.
    fn fetch(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> impl Future<Output = AppResult<Vec<ProposalListItem>>> + Send;
}

/// Latest semester first; within a semester, highest proposal code first.
pub fn latest_first(a: &ProposalListItem, b: &ProposalListItem) -> Ordering {
    b.semester
        .cmp(&a.semester)
        .then_with(|| b.proposal_code.cmp(&a.proposal_code))
}

pub fn in_semester_range(item: &ProposalListItem, start: &str, end: &str) -> bool {
    item.semester.as_str() >= start && item.semester.as_str() <= end
}

/// Proposals already held in memory, e.g. loaded from a JSON export.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProposals {
    proposals: Vec<ProposalListItem>,
}

impl InMemoryProposals {
    pub fn new(proposals: Vec<ProposalListItem>) -> Self {
        InMemoryProposals { proposals }
    }

    pub fn find_in_range(&self, start: &str, end: &str, limit: usize) -> Vec<ProposalListItem> {
        let mut found: Vec<ProposalListItem> = self
            .proposals
            .iter()
            .filter(|p| in_semester_range(p, start, end))
            .cloned()
            .collect();
        found.sort_by(latest_first);
        found.truncate(limit);
        found
    }
}

impl ProposalSource for InMemoryProposals {
    fn fetch(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> impl Future<Output = AppResult<Vec<ProposalListItem>>> + Send {
        let found = self.find_in_range(start, end, limit);
        log::debug!("Found {} proposals for semesters {start} to {end}", found.len());
        async move { Ok(found) }
    }
}

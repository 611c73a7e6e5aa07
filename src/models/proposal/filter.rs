// src/models/proposal/filter.rs
use std::fmt;
use std::str::FromStr;

use super::types::{ProposalListItem, ProposalStatus, ProposalType};
use crate::errors::AppError;

/// The user the list is being shown to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: Option<i64>,
}

impl UserContext {
    pub fn logged_in(user_id: i64) -> Self {
        UserContext { user_id: Some(user_id) }
    }

    pub fn anonymous() -> Self {
        UserContext { user_id: None }
    }

    fn is_pi(&self, item: &ProposalListItem) -> bool {
        self.user_id == Some(item.principal_investigator.id)
    }

    fn is_liaison(&self, item: &ProposalListItem) -> bool {
        self.user_id.is_some()
            && item.liaison_astronomer.as_ref().map(|la| la.id) == self.user_id
    }
}

/// Named checkbox filters of the proposal list. Enabled filters are ANDed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProposalFilter {
    Unassigned,
    Unchecked,
    Active,
    Completed,
    MyProposals,
    RequiringAttention,
    Science,
    Commissioning,
    Ddt,
    Phase1,
    Phase2,
    RejectedCompletedExpired,
}

impl ProposalFilter {
    pub const ALL: [ProposalFilter; 12] = [
        ProposalFilter::Unassigned,
        ProposalFilter::Unchecked,
        ProposalFilter::Active,
        ProposalFilter::Completed,
        ProposalFilter::MyProposals,
        ProposalFilter::RequiringAttention,
        ProposalFilter::Science,
        ProposalFilter::Commissioning,
        ProposalFilter::Ddt,
        ProposalFilter::Phase1,
        ProposalFilter::Phase2,
        ProposalFilter::RejectedCompletedExpired,
    ];

    /// Key used in the saved filter selection.
    pub fn name(&self) -> &'static str {
        match self {
            ProposalFilter::Unassigned => "unassigned",
            ProposalFilter::Unchecked => "unchecked",
            ProposalFilter::Active => "active",
            ProposalFilter::Completed => "completed",
            ProposalFilter::MyProposals => "my_proposals",
            ProposalFilter::RequiringAttention => "requiring_attention",
            ProposalFilter::Science => "science",
            ProposalFilter::Commissioning => "commissioning",
            ProposalFilter::Ddt => "ddt",
            ProposalFilter::Phase1 => "phase1",
            ProposalFilter::Phase2 => "phase2",
            ProposalFilter::RejectedCompletedExpired => "rejected_completed_expired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProposalFilter::Unassigned => "Unassigned",
            ProposalFilter::Unchecked => "Unchecked",
            ProposalFilter::Active => "Active",
            ProposalFilter::Completed => "Completed",
            ProposalFilter::MyProposals => "My proposals",
            ProposalFilter::RequiringAttention => "Requiring my attention",
            ProposalFilter::Science => "Science",
            ProposalFilter::Commissioning => "Commissioning",
            ProposalFilter::Ddt => "DDT",
            ProposalFilter::Phase1 => "Phase 1",
            ProposalFilter::Phase2 => "Phase 2",
            ProposalFilter::RejectedCompletedExpired => "Rejected, completed or expired",
        }
    }

    pub fn matches(&self, item: &ProposalListItem, user: &UserContext) -> bool {
        match self {
            ProposalFilter::Unassigned => item.liaison_astronomer.is_none(),
            ProposalFilter::Unchecked => item.status.is_pending_review(),
            ProposalFilter::Active => item.status == ProposalStatus::Active,
            ProposalFilter::Completed => item.status == ProposalStatus::Completed,
            ProposalFilter::MyProposals => user.is_pi(item) || user.is_liaison(item),
            ProposalFilter::RequiringAttention => {
                user.is_liaison(item) && item.status.is_pending_review()
            }
            ProposalFilter::Science => item.proposal_type == ProposalType::Science,
            ProposalFilter::Commissioning => item.proposal_type == ProposalType::Commissioning,
            ProposalFilter::Ddt => item.proposal_type == ProposalType::DirectorsDiscretionaryTime,
            ProposalFilter::Phase1 => item.phase == 1,
            ProposalFilter::Phase2 => item.phase == 2,
            ProposalFilter::RejectedCompletedExpired => matches!(
                item.status,
                ProposalStatus::Rejected | ProposalStatus::Completed | ProposalStatus::Expired
            ),
        }
    }
}

impl fmt::Display for ProposalFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProposalFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProposalFilter::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown proposal filter \"{s}\"")))
    }
}

/// True if the item passes every filter.
pub fn matches_all(filters: &[ProposalFilter], item: &ProposalListItem, user: &UserContext) -> bool {
    filters.iter().all(|f| f.matches(item, user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::proposal::types::Investigator;

    fn person(id: i64) -> Investigator {
        Investigator { id, given_name: "Given".into(), family_name: format!("Family{id}") }
    }

    fn item(status: ProposalStatus, liaison: Option<i64>) -> ProposalListItem {
        ProposalListItem {
            proposal_code: "2021-1-SCI-001".into(),
            title: "Stars".into(),
            semester: "2021-1".into(),
            status,
            proposal_type: ProposalType::Science,
            phase: 1,
            principal_investigator: person(7),
            liaison_astronomer: liaison.map(person),
        }
    }

    #[test]
    fn names_roundtrip_through_from_str() {
        for f in ProposalFilter::ALL {
            assert_eq!(f.name().parse::<ProposalFilter>().unwrap(), f);
        }
        assert!("nonexistent".parse::<ProposalFilter>().is_err());
    }

    #[test]
    fn unassigned_and_unchecked() {
        let user = UserContext::anonymous();
        let p = item(ProposalStatus::UnderTechnicalReview, None);
        assert!(ProposalFilter::Unassigned.matches(&p, &user));
        assert!(ProposalFilter::Unchecked.matches(&p, &user));
        let p = item(ProposalStatus::Active, Some(3));
        assert!(!ProposalFilter::Unassigned.matches(&p, &user));
        assert!(!ProposalFilter::Unchecked.matches(&p, &user));
    }

    #[test]
    fn my_proposals_covers_pi_and_liaison() {
        let p = item(ProposalStatus::Active, Some(3));
        assert!(ProposalFilter::MyProposals.matches(&p, &UserContext::logged_in(7)));
        assert!(ProposalFilter::MyProposals.matches(&p, &UserContext::logged_in(3)));
        assert!(!ProposalFilter::MyProposals.matches(&p, &UserContext::logged_in(4)));
    }

    #[test]
    fn anonymous_user_has_no_proposals() {
        let p = item(ProposalStatus::UnderScientificReview, None);
        assert!(!ProposalFilter::MyProposals.matches(&p, &UserContext::anonymous()));
        assert!(!ProposalFilter::RequiringAttention.matches(&p, &UserContext::anonymous()));
    }

    #[test]
    fn requiring_attention_needs_liaison_and_pending_review() {
        let la = UserContext::logged_in(3);
        assert!(ProposalFilter::RequiringAttention
            .matches(&item(ProposalStatus::UnderScientificReview, Some(3)), &la));
        assert!(!ProposalFilter::RequiringAttention.matches(&item(ProposalStatus::Active, Some(3)), &la));
        // The PI is not asked to review their own proposal.
        assert!(!ProposalFilter::RequiringAttention
            .matches(&item(ProposalStatus::UnderScientificReview, Some(3)), &UserContext::logged_in(7)));
    }

    #[test]
    fn closed_statuses() {
        let user = UserContext::anonymous();
        for s in [ProposalStatus::Rejected, ProposalStatus::Completed, ProposalStatus::Expired] {
            assert!(ProposalFilter::RejectedCompletedExpired.matches(&item(s, None), &user));
        }
        assert!(!ProposalFilter::RejectedCompletedExpired.matches(&item(ProposalStatus::Active, None), &user));
    }

    fn typed(proposal_type: ProposalType) -> ProposalListItem {
        ProposalListItem { proposal_type, ..item(ProposalStatus::Active, None) }
    }

    #[test]
    fn completed_only_matches_completed() {
        let user = UserContext::anonymous();
        assert!(ProposalFilter::Completed.matches(&item(ProposalStatus::Completed, None), &user));
        for s in [ProposalStatus::Active, ProposalStatus::Rejected, ProposalStatus::Expired] {
            assert!(!ProposalFilter::Completed.matches(&item(s, None), &user));
        }
    }

    #[test]
    fn proposal_type_filters() {
        let user = UserContext::anonymous();
        let commissioning = typed(ProposalType::Commissioning);
        assert!(ProposalFilter::Commissioning.matches(&commissioning, &user));
        assert!(!ProposalFilter::Science.matches(&commissioning, &user));
        assert!(!ProposalFilter::Ddt.matches(&commissioning, &user));

        let ddt = typed(ProposalType::DirectorsDiscretionaryTime);
        assert!(ProposalFilter::Ddt.matches(&ddt, &user));
        assert!(!ProposalFilter::Commissioning.matches(&ddt, &user));

        let science = typed(ProposalType::Science);
        assert!(!ProposalFilter::Commissioning.matches(&science, &user));
        assert!(!ProposalFilter::Ddt.matches(&science, &user));
        // Other science-like types are not plain science.
        assert!(!ProposalFilter::Science.matches(&typed(ProposalType::KeyScienceProgram), &user));
    }

    #[test]
    fn labels_are_distinct() {
        let mut labels: Vec<_> = ProposalFilter::ALL.iter().map(|f| f.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), ProposalFilter::ALL.len());
        assert_eq!(ProposalFilter::Ddt.label(), "DDT");
    }

    #[test]
    fn matches_all_is_conjunction() {
        let user = UserContext::anonymous();
        let p = item(ProposalStatus::Active, None);
        assert!(matches_all(&[], &p, &user));
        assert!(matches_all(&[ProposalFilter::Active, ProposalFilter::Phase1], &p, &user));
        assert!(!matches_all(&[ProposalFilter::Active, ProposalFilter::Phase2], &p, &user));
    }
}

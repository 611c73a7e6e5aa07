use serde::{Deserialize, Serialize};

use crate::models::table_filter::comparator::{Accessor, SortFields};
use crate::models::table_filter::{FieldPath, SortValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Active,
    Accepted,
    Completed,
    Deleted,
    Expired,
    Inactive,
    Rejected,
    Superseded,
    #[serde(rename = "Under scientific review")]
    UnderScientificReview,
    #[serde(rename = "Under technical review")]
    UnderTechnicalReview,
    Withdrawn,
}

impl ProposalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProposalStatus::Active => "Active",
            ProposalStatus::Accepted => "Accepted",
            ProposalStatus::Completed => "Completed",
            ProposalStatus::Deleted => "Deleted",
            ProposalStatus::Expired => "Expired",
            ProposalStatus::Inactive => "Inactive",
            ProposalStatus::Rejected => "Rejected",
            ProposalStatus::Superseded => "Superseded",
            ProposalStatus::UnderScientificReview => "Under scientific review",
            ProposalStatus::UnderTechnicalReview => "Under technical review",
            ProposalStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Submitted but not yet through technical or scientific review.
    pub fn is_pending_review(&self) -> bool {
        matches!(
            self,
            ProposalStatus::UnderScientificReview | ProposalStatus::UnderTechnicalReview
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalType {
    Science,
    #[serde(rename = "Key Science Program")]
    KeyScienceProgram,
    #[serde(rename = "Large Science Proposal")]
    LargeScienceProposal,
    Commissioning,
    #[serde(rename = "Director's Discretionary Time")]
    DirectorsDiscretionaryTime,
    #[serde(rename = "Science Verification")]
    ScienceVerification,
    Engineering,
}

impl ProposalType {
    pub fn label(&self) -> &'static str {
        match self {
            ProposalType::Science => "Science",
            ProposalType::KeyScienceProgram => "Key Science Program",
            ProposalType::LargeScienceProposal => "Large Science Proposal",
            ProposalType::Commissioning => "Commissioning",
            ProposalType::DirectorsDiscretionaryTime => "Director's Discretionary Time",
            ProposalType::ScienceVerification => "Science Verification",
            ProposalType::Engineering => "Engineering",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigator {
    pub id: i64,
    pub given_name: String,
    pub family_name: String,
}

impl Investigator {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Proposal as shown in the proposal list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalListItem {
    pub proposal_code: String,
    pub title: String,
    /// `yyyy-n`
    pub semester: String,
    pub status: ProposalStatus,
    pub proposal_type: ProposalType,
    /// 1 or 2.
    pub phase: u8,
    pub principal_investigator: Investigator,
    #[serde(default)]
    pub liaison_astronomer: Option<Investigator>,
}

impl SortFields for ProposalListItem {
    fn accessor(path: &FieldPath) -> Option<Accessor<Self>> {
        let accessor: Accessor<Self> = match (path.outer.as_str(), path.inner.as_deref()) {
            ("proposal_code", None) => |p| SortValue::from(p.proposal_code.as_str()),
            ("title", None) => |p| SortValue::from(p.title.as_str()),
            ("semester", None) => |p| SortValue::from(p.semester.as_str()),
            ("status", None) => |p| SortValue::from(p.status.label()),
            ("proposal_type", None) => |p| SortValue::from(p.proposal_type.label()),
            ("phase", None) => |p| SortValue::from(i64::from(p.phase)),
            // Nested investigator fields; an absent liaison astronomer is Missing.
            ("principal_investigator", Some("id")) => |p| SortValue::from(p.principal_investigator.id),
            ("principal_investigator", Some("given_name")) => {
                |p| SortValue::from(p.principal_investigator.given_name.as_str())
            }
            ("principal_investigator", Some("family_name")) => {
                |p| SortValue::from(p.principal_investigator.family_name.as_str())
            }
            ("liaison_astronomer", Some("id")) => {
                |p| SortValue::from(p.liaison_astronomer.as_ref().map(|la| la.id))
            }
            ("liaison_astronomer", Some("given_name")) => {
                |p| SortValue::from(p.liaison_astronomer.as_ref().map(|la| la.given_name.as_str()))
            }
            ("liaison_astronomer", Some("family_name")) => {
                |p| SortValue::from(p.liaison_astronomer.as_ref().map(|la| la.family_name.as_str()))
            }
            _ => return None,
        };
        Some(accessor)
    }
}

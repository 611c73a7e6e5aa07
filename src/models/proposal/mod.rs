pub mod filter;
pub mod queries;
pub mod selection;
pub mod types;

pub use filter::{ProposalFilter, UserContext};
pub use queries::{InMemoryProposals, ProposalSource};
pub use selection::{FilterSelection, SemesterFilter};
pub use types::*;

pub mod list;
pub mod refresh;

pub use list::{ListContext, ListMessage, ProposalListOutcome, ProposalListView};
pub use refresh::{DebouncedFetcher, FetchedPage, Subscription};

pub mod proposal_handlers;

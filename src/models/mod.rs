//! Plain data handed to front ends.
//!
//! - `commit`: CommitRecord, CommitOutcome
//! - `preview`: Preview, Unavailable
//! - `status`: Status line text for the last outcome

pub mod commit;
pub mod preview;
pub mod status;

pub use commit::*;
pub use preview::*;
pub use status::*;

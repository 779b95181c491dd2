//! Repository access through libgit2.
//!
//! Each submodule adds a group of operations to `GitRepository`:
//! - `repository`: locating the repository that encloses a file
//! - `history`: commits that changed one path
//! - `content`: raw blob bytes of a path at a revision
//! - `status`: untracked and changed paths in the working tree
//! - `commit`: committing a single path

pub mod commit;
pub mod content;
pub mod history;
pub mod repository;
pub mod status;

pub use history::{HISTORY_LIMIT, PathHistory};
pub use repository::GitRepository;
pub use status::ModificationStatus;

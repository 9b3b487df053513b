pub mod commit;

pub use commit::{CommitWindow, GitCommitRepository};

pub mod bookmarks;
pub mod jobs;

pub use bookmarks::{BookmarkError, BookmarkService};
pub use jobs::{JobError, JobService};

pub mod bookmark;
pub mod job;
pub mod user;

pub use bookmark::{Bookmark, BookmarkJobRow, BookmarkWithJob};
pub use job::{Job, JobOwnerRow, JobType, JobWithOwner, OwnerPublic};
pub use user::User;

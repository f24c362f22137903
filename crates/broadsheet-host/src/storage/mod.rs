pub mod json_archive;

pub use json_archive::{ArchiveError, JsonArchiveStore};

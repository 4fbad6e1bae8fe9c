//! In-memory project model answering the resolver's index queries.

mod index;
mod layout;

pub use index::{LiveBinaryRoots, ProjectIndex};
pub use layout::{LAYOUT_FILE_NAME, ProjectEntry, ProjectLayout};

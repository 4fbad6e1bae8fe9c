pub mod artifact;
pub mod event;

pub use artifact::*;
pub use event::*;

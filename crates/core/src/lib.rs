pub mod cache;
pub mod error;
pub mod logging;
pub mod naming;
pub mod project;
pub mod resolver;
pub mod watch;

pub use error::Result;
pub use resolver::{Collaborators, ModuleNames};

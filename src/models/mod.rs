pub mod language;
pub mod repo;

pub use language::*;
pub use repo::*;

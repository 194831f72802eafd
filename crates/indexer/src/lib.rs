pub mod aggregates;
pub mod dispatcher;
pub mod error;
pub mod handlers;

pub use dispatcher::Indexer;
pub use error::IndexError;
pub use handlers::{Outcome, SkipReason};

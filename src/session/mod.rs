//! Runtime side: shard loading and the per-selection query state the map client reads.

mod cache;
mod error;
mod loader;
mod session;

pub use cache::ShardCache;
pub use error::LoadError;
pub use loader::ShardLoader;
pub use session::{LoadState, LoadTicket, Selection, Session};

//! Session layer around the deterministic `hexline-core` engine.
//!
//! The core is pure; this crate adds what a hosted game needs around it:
//! - [`repository`] stores game records with optimistic version checks
//! - [`session`] turns proposed moves into committed, recorded groups
//! - [`replica`] keeps read-side copies current by replaying changes
//!
//! All logging goes through `tracing`; install a subscriber to see it.
pub mod error;
pub mod replica;
pub mod repository;
pub mod session;

mod utils;

pub use error::{Result, RuntimeError};
pub use replica::Replica;
pub use repository::{
    CommitInfo, FileGameRepository, GameRecord, GameRepository, InMemoryGameRepo,
    RepositoryError,
};
pub use session::{Committed, GameSession};
pub use utils::short_digest;

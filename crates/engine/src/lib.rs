//! Progress derivation and ranking for the reading plan.
//!
//! The engine classifies readings against a reference day and a user's
//! completion records, derives per-user statistics, flips completion
//! state, and ranks the whole group. It is pure recomputation over
//! snapshots handed to it; nothing is cached between calls.

#![warn(missing_docs)]

pub mod error;
pub mod progress;
pub mod toggle;
pub mod leaderboard;
pub mod service;
pub mod session;

pub use error::EngineError;
pub use leaderboard::{rank, LeaderboardEntry};
pub use service::TrackerService;
pub use session::IdentityProvider;
pub use toggle::ToggleController;

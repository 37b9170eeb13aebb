//! # Domain Layer
//!
//! Business logic of the chore tracker:
//!
//! - **calendar / clock**: week boundaries and the injectable notion of today
//! - **task_registry**: per-child task definitions
//! - **completion_ledger**: (child, task, date) completion facts
//! - **adjustment_ledger**: manual bonuses and penalties
//! - **scoring**: points, allowance, levels and the leaderboard
//! - **progression**: perfect days, streaks and badges
//! - **chore_service**: owner of the state, saving after every mutation
//!
//! Everything except the service is a function of a borrowed [`AppData`];
//! the service is the only place state lives between calls.
//!
//! [`AppData`]: models::AppData

pub mod adjustment_ledger;
pub mod calendar;
pub mod chore_service;
pub mod clock;
pub mod commands;
pub mod completion_ledger;
pub mod errors;
pub mod models;
pub mod progression;
pub mod scoring;
pub mod task_registry;

pub use chore_service::ChoreService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::ChoreError;

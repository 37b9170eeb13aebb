//! Domain models for the chore tracker.

pub mod adjustment;
pub mod badge;
pub mod child;
pub mod completion;
pub(crate) mod legacy;
pub mod state;
pub mod task;
pub mod weekday;

pub use adjustment::{AdjustmentKind, PointAdjustment, MAX_ADJUSTMENTS};
pub use badge::{BadgeCount, BadgeKey, BadgeKind, BadgeLedger, BadgeRecord};
pub use child::{Child, ChildProfile};
pub use completion::{CompletionKey, CompletionLedger};
pub use state::{AppData, Settings};
pub use task::Task;
pub use weekday::WeekdaySet;

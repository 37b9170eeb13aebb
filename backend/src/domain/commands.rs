//! Domain-level command types.
//!
//! These structs are consumed by the `ChoreService` and are not exposed over
//! the public API. The REST layer maps the DTOs in the `shared` crate onto
//! them.

pub mod tasks {
    use crate::domain::models::WeekdaySet;

    /// Fields of a task to create. Absent values take the documented defaults.
    #[derive(Debug, Clone, Default)]
    pub struct TaskSpec {
        pub name: String,
        pub points: Option<u32>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub active_days: Option<WeekdaySet>,
    }

    /// Create one task per listed child, all sharing the same spec.
    #[derive(Debug, Clone)]
    pub struct AddTaskCommand {
        pub child_ids: Vec<String>,
        pub spec: TaskSpec,
    }

    /// Partial update of a single child's task.
    #[derive(Debug, Clone, Default)]
    pub struct TaskPatch {
        pub name: Option<String>,
        pub points: Option<u32>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub active_days: Option<WeekdaySet>,
    }

    impl TaskPatch {
        pub fn is_empty(&self) -> bool {
            self.name.is_none()
                && self.points.is_none()
                && self.icon.is_none()
                && self.color.is_none()
                && self.active_days.is_none()
        }
    }
}

pub mod adjustments {
    use crate::domain::models::AdjustmentKind;

    /// Input for recording a manual bonus or penalty.
    #[derive(Debug, Clone)]
    pub struct AddAdjustmentCommand {
        pub child_id: String,
        pub amount: u32,
        pub reason: String,
        pub kind: AdjustmentKind,
    }

    /// Query for the adjustment history.
    #[derive(Debug, Clone, Default)]
    pub struct ListAdjustmentsQuery {
        pub child_id: Option<String>,
        pub limit: Option<usize>,
    }
}

pub mod settings {
    use std::collections::BTreeMap;

    /// Replace the allowance ceiling for every listed child.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateAllowancesCommand {
        pub allowances: BTreeMap<String, f64>,
    }
}

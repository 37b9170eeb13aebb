//! Chore service: owner of the canonical application state.
//!
//! The service is the only long-lived holder of [`AppData`]. Every mutation
//! validates its input, applies the change through the ledger modules, and
//! saves locally before returning. Queries borrow the state for one call and
//! read "today" from the injected [`Clock`].
//!
//! ## Failure policy
//!
//! - A stored document that is absent or malformed is replaced by the default
//!   state, which is written back immediately.
//! - A storage read failure falls back to the default state in memory only.
//! - A save failure is logged; the in-memory state stays authoritative.

use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::domain::adjustment_ledger;
use crate::domain::clock::Clock;
use crate::domain::commands::adjustments::{AddAdjustmentCommand, ListAdjustmentsQuery};
use crate::domain::commands::settings::UpdateAllowancesCommand;
use crate::domain::commands::tasks::{AddTaskCommand, TaskPatch};
use crate::domain::completion_ledger;
use crate::domain::errors::ChoreError;
use crate::domain::models::adjustment::{DEFAULT_ADJUSTMENT_LIMIT, MAX_ADJUSTMENT_AMOUNT};
use crate::domain::models::task::MAX_TASK_POINTS;
use crate::domain::models::{AppData, BadgeCount, ChildProfile, PointAdjustment, Task};
use crate::domain::progression;
use crate::domain::scoring::{self, ChildSummary, DayView, LeaderboardEntry, Level, Points, WeekSummary};
use crate::domain::task_registry;
use crate::domain::calendar;
use crate::storage::document;
use crate::storage::StateStorage;

fn validate_points(points: Option<u32>) -> Result<(), ChoreError> {
    match points {
        Some(0) => Err(ChoreError::validation("Task points must be positive")),
        Some(points) if points > MAX_TASK_POINTS => Err(ChoreError::validation(format!(
            "Task points cannot exceed {}",
            MAX_TASK_POINTS
        ))),
        _ => Ok(()),
    }
}

pub struct ChoreService {
    data: AppData,
    storage: Arc<dyn StateStorage>,
    clock: Arc<dyn Clock>,
    roster: Vec<ChildProfile>,
}

impl ChoreService {
    /// Load the stored state, materializing and persisting the default state
    /// when nothing usable is stored
    pub fn load(storage: Arc<dyn StateStorage>, clock: Arc<dyn Clock>, roster: Vec<ChildProfile>) -> Self {
        let defaults = AppData::for_roster(&roster, clock.today());
        let mut service = Self {
            data: defaults.clone(),
            storage,
            clock,
            roster,
        };

        match service.storage.load_document() {
            Ok(Some(raw)) => match document::upgrade(&raw, &defaults) {
                Ok(data) => {
                    info!("Loaded state from {}", service.storage.location());
                    service.data = data;
                    // Rewrite in the current shape so legacy keys migrate once
                    service.save();
                }
                Err(e) => {
                    warn!("Stored state is malformed, starting fresh: {:#}", e);
                    service.save();
                }
            },
            Ok(None) => {
                info!("No stored state at {}, creating default", service.storage.location());
                service.save();
            }
            Err(e) => {
                error!("Failed to read stored state, using in-memory default: {:#}", e);
            }
        }

        service
    }

    /// Persist the current state, logging any failure
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            error!("{}", e);
        }
    }

    pub fn try_save(&self) -> Result<(), ChoreError> {
        let raw = document::to_document(&self.data).map_err(|e| ChoreError::Persistence(format!("{:#}", e)))?;
        self.storage
            .save_document(&raw)
            .map_err(|e| ChoreError::Persistence(format!("{:#}", e)))?;
        debug!("Saved state to {}", self.storage.location());
        Ok(())
    }

    pub fn state(&self) -> &AppData {
        &self.data
    }

    /// Replace the whole state (a remote document won) and persist it
    pub fn replace_state(&mut self, data: AppData) {
        info!("Replacing local state wholesale");
        self.data = data;
        self.save();
    }

    /// The state a fresh install would start with today
    pub fn default_state(&self) -> AppData {
        AppData::for_roster(&self.roster, self.clock.today())
    }

    pub fn roster(&self) -> &[ChildProfile] {
        &self.roster
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn epoch_millis(&self) -> i64 {
        self.clock.epoch_millis()
    }

    fn require_child(&self, child_id: &str) -> Result<(), ChoreError> {
        if self.data.child(child_id).is_some() {
            Ok(())
        } else {
            Err(ChoreError::child_not_found(child_id))
        }
    }

    // Tasks

    /// Add the same task to every listed child; each copy gets its own id
    pub fn add_task(&mut self, command: AddTaskCommand) -> Result<Vec<Task>, ChoreError> {
        let spec = command.spec;
        if command.child_ids.is_empty() {
            return Err(ChoreError::validation("Select at least one child"));
        }
        if spec.name.trim().is_empty() {
            return Err(ChoreError::validation("Task name cannot be empty"));
        }
        validate_points(spec.points)?;
        if spec.active_days.is_some_and(|days| days.is_empty()) {
            return Err(ChoreError::validation("Select at least one active day"));
        }
        for child_id in &command.child_ids {
            self.require_child(child_id)?;
        }

        let now = self.clock.now_utc();
        let mut created = Vec::with_capacity(command.child_ids.len());
        for child_id in &command.child_ids {
            created.push(task_registry::add_task(
                &mut self.data,
                child_id,
                &spec,
                Task::generate_id(),
                now,
            )?);
        }

        self.save();
        Ok(created)
    }

    /// Unknown child or task ids are ignored
    pub fn update_task(&mut self, child_id: &str, task_id: &str, patch: TaskPatch) -> Result<(), ChoreError> {
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ChoreError::validation("Task name cannot be empty"));
        }
        validate_points(patch.points)?;
        if patch.active_days.is_some_and(|days| days.is_empty()) {
            return Err(ChoreError::validation("Select at least one active day"));
        }

        if task_registry::update_task(&mut self.data, child_id, task_id, &patch) {
            self.save();
        }
        Ok(())
    }

    /// Unknown child or task ids are ignored
    pub fn delete_task(&mut self, child_id: &str, task_id: &str) {
        if task_registry::delete_task(&mut self.data, child_id, task_id) {
            self.save();
        }
    }

    pub fn list_tasks(&self, child_id: &str) -> &[Task] {
        task_registry::list_tasks(&self.data, child_id)
    }

    // Completions

    /// Toggle a completion (today when `date` is absent) and return the new
    /// completed state
    pub fn toggle_completion(
        &mut self,
        child_id: &str,
        task_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<bool, ChoreError> {
        let date = date.unwrap_or_else(|| self.clock.today());
        let completed = completion_ledger::toggle(&mut self.data, child_id, task_id, date, self.clock.now_utc())?;
        self.save();
        Ok(completed)
    }

    pub fn is_completed(&self, child_id: &str, task_id: &str, date: NaiveDate) -> bool {
        completion_ledger::is_completed(&self.data, child_id, task_id, date)
    }

    // Adjustments

    pub fn add_adjustment(&mut self, command: AddAdjustmentCommand) -> Result<PointAdjustment, ChoreError> {
        let reason = command.reason.trim();
        if reason.is_empty() {
            return Err(ChoreError::validation("Please enter a reason"));
        }
        if command.amount == 0 {
            return Err(ChoreError::validation("Amount must be positive"));
        }
        if command.amount > MAX_ADJUSTMENT_AMOUNT {
            return Err(ChoreError::validation(format!(
                "Amount cannot exceed {}",
                MAX_ADJUSTMENT_AMOUNT
            )));
        }
        self.require_child(&command.child_id)?;

        let adjustment = PointAdjustment {
            id: PointAdjustment::generate_id(self.clock.epoch_millis()),
            child_id: command.child_id,
            amount: command.amount,
            reason: reason.to_string(),
            kind: command.kind,
            created_at: self.clock.now_utc(),
        };
        adjustment_ledger::add(&mut self.data, adjustment.clone());

        self.save();
        Ok(adjustment)
    }

    /// Unknown ids are ignored
    pub fn delete_adjustment(&mut self, adjustment_id: &str) {
        if adjustment_ledger::delete(&mut self.data, adjustment_id) {
            self.save();
        }
    }

    pub fn list_adjustments(&self, query: ListAdjustmentsQuery) -> Vec<PointAdjustment> {
        let limit = query.limit.unwrap_or(DEFAULT_ADJUSTMENT_LIMIT);
        adjustment_ledger::list(&self.data, query.child_id.as_deref(), limit)
            .into_iter()
            .cloned()
            .collect()
    }

    // Settings

    pub fn set_allowance(&mut self, child_id: &str, amount: f64) -> Result<(), ChoreError> {
        let mut allowances = std::collections::BTreeMap::new();
        allowances.insert(child_id.to_string(), amount);
        self.update_allowances(UpdateAllowancesCommand { allowances })
    }

    /// Set several allowance ceilings at once; nothing changes unless every
    /// entry is valid
    pub fn update_allowances(&mut self, command: UpdateAllowancesCommand) -> Result<(), ChoreError> {
        for (child_id, amount) in &command.allowances {
            self.require_child(child_id)?;
            if !amount.is_finite() || *amount < 0.0 {
                return Err(ChoreError::validation(format!(
                    "Allowance for {} must be a non-negative amount",
                    child_id
                )));
            }
        }

        for (child_id, amount) in command.allowances {
            info!("Setting allowance for {} to ${:.2}", child_id, amount);
            self.data.settings.allowances.insert(child_id, amount);
        }
        self.save();
        Ok(())
    }

    /// Move the scored week to the current Monday. History is kept.
    pub fn start_new_week(&mut self) -> NaiveDate {
        let monday = calendar::week_start(self.clock.today());
        info!("Starting new week on {}", monday);
        self.data.settings.week_start = Some(monday);
        self.save();
        monday
    }

    pub fn week_start(&self) -> NaiveDate {
        self.data.effective_week_start(self.clock.today())
    }

    // Scoring queries

    pub fn day_points(&self, child_id: &str, date: NaiveDate) -> Points {
        scoring::day_points(&self.data, child_id, date)
    }

    /// Points for the week starting at `week_start`, or the current week
    pub fn week_points(&self, child_id: &str, week_start: Option<NaiveDate>) -> Points {
        let start = week_start.unwrap_or_else(|| self.week_start());
        scoring::week_points(&self.data, child_id, start, self.clock.today())
    }

    pub fn week_summary(&self, child_id: &str, week_start: Option<NaiveDate>) -> Result<WeekSummary, ChoreError> {
        self.require_child(child_id)?;
        let start = week_start.unwrap_or_else(|| self.week_start());
        Ok(scoring::week_summary(&self.data, child_id, start, self.clock.today()))
    }

    pub fn weekly_money(&self, child_id: &str) -> f64 {
        scoring::weekly_money(&self.data, child_id, self.clock.today())
    }

    pub fn lifetime_points(&self, child_id: &str) -> u32 {
        scoring::lifetime_points(&self.data, child_id)
    }

    pub fn level(&self, child_id: &str) -> Level {
        scoring::level(self.lifetime_points(child_id))
    }

    pub fn level_progress(&self, child_id: &str) -> u32 {
        scoring::level_progress(self.lifetime_points(child_id))
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        scoring::leaderboard(&self.data, self.clock.today())
    }

    pub fn child_summary(&self, child_id: &str) -> Result<ChildSummary, ChoreError> {
        self.require_child(child_id)?;
        Ok(scoring::child_summary(&self.data, child_id, self.clock.today()))
    }

    pub fn day_view(&self, child_id: &str, date: NaiveDate) -> Result<DayView, ChoreError> {
        scoring::day_view(&self.data, child_id, date).ok_or_else(|| ChoreError::child_not_found(child_id))
    }

    // Progression queries

    pub fn current_streak(&self, child_id: &str) -> u32 {
        progression::current_streak(&self.data, child_id, self.clock.today())
    }

    pub fn kid_badges(&self, child_id: &str) -> Vec<BadgeCount> {
        progression::kid_badges(&self.data, child_id)
    }

    pub fn is_perfect_day(&self, child_id: &str, date: NaiveDate) -> bool {
        progression::is_perfect_day(&self.data, child_id, date)
    }

    /// The last `n` days ending today, oldest first
    pub fn last_n_days(&self, n: usize) -> Vec<NaiveDate> {
        calendar::last_n_days(self.clock.today(), n)
    }
}

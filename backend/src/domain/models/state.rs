//! The aggregate root persisted locally and mirrored to the remote store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::adjustment::PointAdjustment;
use super::badge::BadgeLedger;
use super::child::{Child, ChildProfile};
use super::completion::CompletionLedger;
use super::legacy;
use crate::domain::calendar;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Weekly allowance ceiling per child id
    #[serde(default)]
    pub allowances: BTreeMap<String, f64>,
    /// Monday of the week currently being scored
    #[serde(default, deserialize_with = "legacy::deserialize_week_start")]
    pub week_start: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub children: BTreeMap<String, Child>,
    #[serde(default)]
    pub completions: CompletionLedger,
    #[serde(default)]
    pub badges: BadgeLedger,
    #[serde(default)]
    pub point_adjustments: Vec<PointAdjustment>,
}

impl AppData {
    /// Fresh state for a roster: every child present with no tasks, default
    /// allowances, and the week starting on the Monday of `today`'s week
    pub fn for_roster(roster: &[ChildProfile], today: NaiveDate) -> Self {
        let children = roster
            .iter()
            .map(|profile| (profile.id.clone(), profile.to_child()))
            .collect();
        let allowances = roster
            .iter()
            .map(|profile| (profile.id.clone(), profile.allowance))
            .collect();

        Self {
            settings: Settings {
                allowances,
                week_start: Some(calendar::week_start(today)),
            },
            children,
            completions: CompletionLedger::new(),
            badges: BadgeLedger::new(),
            point_adjustments: Vec::new(),
        }
    }

    pub fn child(&self, child_id: &str) -> Option<&Child> {
        self.children.get(child_id)
    }

    pub fn child_mut(&mut self, child_id: &str) -> Option<&mut Child> {
        self.children.get_mut(child_id)
    }

    /// Allowance ceiling for a child, zero when unset
    pub fn allowance(&self, child_id: &str) -> f64 {
        self.settings.allowances.get(child_id).copied().unwrap_or(0.0)
    }

    /// The stored week start, or the Monday of `today`'s week when unset
    pub fn effective_week_start(&self, today: NaiveDate) -> NaiveDate {
        self.settings
            .week_start
            .unwrap_or_else(|| calendar::week_start(today))
    }
}

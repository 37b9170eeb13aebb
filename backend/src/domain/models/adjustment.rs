//! Manual point bonuses and penalties, independent of tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The adjustment ledger keeps at most this many entries across all children
pub const MAX_ADJUSTMENTS: usize = 50;

/// Default page size when listing adjustments
pub const DEFAULT_ADJUSTMENT_LIMIT: usize = 20;

/// Largest bonus or penalty a single adjustment may carry
pub const MAX_ADJUSTMENT_AMOUNT: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Bonus,
    Penalty,
}

impl AdjustmentKind {
    /// Signed effect of `amount` points of this kind
    pub fn signed(&self, amount: u32) -> i64 {
        match self {
            AdjustmentKind::Bonus => amount as i64,
            AdjustmentKind::Penalty => -(amount as i64),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Bonus => "bonus",
            AdjustmentKind::Penalty => "penalty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointAdjustment {
    pub id: String,
    #[serde(alias = "kidId")]
    pub child_id: String,
    pub amount: u32,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
}

impl PointAdjustment {
    pub fn generate_id(epoch_millis: i64) -> String {
        format!("adj::{}::{}", epoch_millis, &Uuid::new_v4().simple().to_string()[..8])
    }

    pub fn signed_amount(&self) -> i64 {
        self.kind.signed(self.amount)
    }
}

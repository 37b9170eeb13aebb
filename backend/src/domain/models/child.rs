//! Domain model for a child and the static roster entry it is created from.

use serde::{Deserialize, Serialize};

use super::task::Task;

/// A child as stored in the application state. The child's id is the key it
/// is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Child {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }
}

/// Static configuration for one member of the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    /// Weekly allowance ceiling in dollars
    pub allowance: f64,
}

impl ChildProfile {
    pub fn new(id: &str, name: &str, avatar: &str, allowance: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            avatar: avatar.to_string(),
            allowance,
        }
    }

    /// The household the tracker ships with
    pub fn default_roster() -> Vec<ChildProfile> {
        vec![
            ChildProfile::new("olive", "Oliver", "assets/olive.png", 50.0),
            ChildProfile::new("miles", "Miles", "assets/miles.png", 30.0),
            ChildProfile::new("zander", "Zander", "assets/zander.png", 20.0),
        ]
    }

    pub fn to_child(&self) -> Child {
        Child {
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            tasks: Vec::new(),
        }
    }
}

//! Conversions between task DTOs and domain task types.

use crate::domain::commands::tasks::{AddTaskCommand, TaskPatch, TaskSpec};
use crate::domain::errors::ChoreError;
use crate::domain::models::{Task, WeekdaySet};
use shared::{CreateTaskRequest, CreateTaskResponse, TaskDto, UpdateTaskRequest};

pub struct TaskMapper;

impl TaskMapper {
    pub fn to_dto(task: &Task) -> TaskDto {
        TaskDto {
            id: task.id.clone(),
            name: task.name.clone(),
            points: task.points,
            icon: task.icon.clone(),
            color: task.color.clone(),
            active_days: task.active_days.indices(),
            created_at: task.created_at.to_rfc3339(),
        }
    }

    fn to_weekday_set(days: Option<Vec<u8>>) -> Result<Option<WeekdaySet>, ChoreError> {
        days.map(|days| WeekdaySet::from_indices(days).map_err(ChoreError::Validation))
            .transpose()
    }

    pub fn to_add_command(request: CreateTaskRequest) -> Result<AddTaskCommand, ChoreError> {
        Ok(AddTaskCommand {
            child_ids: request.child_ids,
            spec: TaskSpec {
                name: request.name,
                points: request.points,
                icon: request.icon,
                color: request.color,
                active_days: Self::to_weekday_set(request.active_days)?,
            },
        })
    }

    pub fn to_patch(request: UpdateTaskRequest) -> Result<TaskPatch, ChoreError> {
        Ok(TaskPatch {
            name: request.name,
            points: request.points,
            icon: request.icon,
            color: request.color,
            active_days: Self::to_weekday_set(request.active_days)?,
        })
    }

    pub fn to_create_response(tasks: &[Task]) -> CreateTaskResponse {
        let success_message = match tasks.len() {
            1 => format!("Task '{}' added", tasks[0].name),
            n => format!("Task added for {} children", n),
        };
        CreateTaskResponse {
            tasks: tasks.iter().map(Self::to_dto).collect(),
            success_message,
        }
    }
}

use crate::domain::models::AppData;
use crate::io::rest::mappers::task_mapper::TaskMapper;
use shared::{ChildDto, ChildListResponse};

/// Mapper from the stored children to their DTOs
pub struct ChildMapper;

impl ChildMapper {
    pub fn to_dto(data: &AppData, child_id: &str) -> Option<ChildDto> {
        let child = data.child(child_id)?;
        Some(ChildDto {
            id: child_id.to_string(),
            name: child.name.clone(),
            avatar: child.avatar.clone(),
            allowance: data.allowance(child_id),
            tasks: child.tasks.iter().map(TaskMapper::to_dto).collect(),
        })
    }

    pub fn to_child_list_dto(data: &AppData) -> ChildListResponse {
        ChildListResponse {
            children: data
                .children
                .keys()
                .filter_map(|child_id| Self::to_dto(data, child_id))
                .collect(),
        }
    }
}

//! Conversions between adjustment DTOs and the domain adjustment ledger.

use crate::domain::commands::adjustments::{AddAdjustmentCommand, ListAdjustmentsQuery};
use crate::domain::models::{AdjustmentKind, PointAdjustment};
use shared::{
    AdjustmentDto, AdjustmentListRequest, AdjustmentListResponse, AdjustmentType, CreateAdjustmentRequest,
};

pub struct AdjustmentMapper;

impl AdjustmentMapper {
    pub fn to_domain_kind(dto: AdjustmentType) -> AdjustmentKind {
        match dto {
            AdjustmentType::Bonus => AdjustmentKind::Bonus,
            AdjustmentType::Penalty => AdjustmentKind::Penalty,
        }
    }

    pub fn to_dto_type(kind: AdjustmentKind) -> AdjustmentType {
        match kind {
            AdjustmentKind::Bonus => AdjustmentType::Bonus,
            AdjustmentKind::Penalty => AdjustmentType::Penalty,
        }
    }

    pub fn to_dto(adjustment: &PointAdjustment) -> AdjustmentDto {
        AdjustmentDto {
            id: adjustment.id.clone(),
            child_id: adjustment.child_id.clone(),
            amount: adjustment.amount,
            reason: adjustment.reason.clone(),
            adjustment_type: Self::to_dto_type(adjustment.kind),
            created_at: adjustment.created_at.to_rfc3339(),
        }
    }

    pub fn to_add_command(request: CreateAdjustmentRequest) -> AddAdjustmentCommand {
        AddAdjustmentCommand {
            child_id: request.child_id,
            amount: request.amount,
            reason: request.reason,
            kind: Self::to_domain_kind(request.adjustment_type),
        }
    }

    pub fn to_list_query(request: AdjustmentListRequest) -> ListAdjustmentsQuery {
        ListAdjustmentsQuery {
            child_id: request.child_id,
            limit: request.limit,
        }
    }

    pub fn to_list_response(adjustments: &[PointAdjustment]) -> AdjustmentListResponse {
        AdjustmentListResponse {
            adjustments: adjustments.iter().map(Self::to_dto).collect(),
        }
    }
}

pub mod adjustment_mapper;
pub mod child_mapper;
pub mod score_mapper;
pub mod task_mapper;

// src/api/dto/mod.rs
pub mod activity_dto;
pub mod building_dto;
pub mod organization_dto;
pub mod organization_query_dto;

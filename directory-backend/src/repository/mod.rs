// src/repository/mod.rs
pub mod activity_repository;
pub mod building_repository;
pub mod crud_repository;
pub mod organization_repository;

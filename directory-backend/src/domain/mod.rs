// src/domain/mod.rs
pub mod activity_model;
pub mod activity_tree;
pub mod building_model;
pub mod organization_activity_model;
pub mod organization_aggregate;
pub mod organization_model;

// src/service/mod.rs
pub mod organization_service;

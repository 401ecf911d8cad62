// src/api/handlers/mod.rs
pub mod organization_handler;
pub mod system_handler;

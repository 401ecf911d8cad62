// src/utils/validation.rs
pub mod common;

// src/handlers/mod.rs

pub mod admin;
pub mod history;
pub mod quiz;
pub mod quiz_details;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI/front-end layers decoupled from storage details.

pub mod reorder;
pub mod todo_service;

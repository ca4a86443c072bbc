//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case APIs.
//! - Keep outer layers decoupled from storage details.

pub mod module_service;

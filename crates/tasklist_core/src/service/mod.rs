//! Core use-case services.
//!
//! # Responsibility
//! - Sequence validation, persistence and list refresh for callers.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod list_cache;
pub mod task_service;

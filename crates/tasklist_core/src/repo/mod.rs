//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the task store contract used by services and the FFI layer.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Writes only accept validated payloads (`ValidTask`).
//! - Repositories hold no cached state; every read hits storage.

pub mod task_repo;

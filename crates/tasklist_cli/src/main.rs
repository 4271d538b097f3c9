//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tasklist_core` linkage.
//! - Exercise the add/complete/refresh path against an in-memory store.

use std::error::Error;
use tasklist_core::db::migrations::latest_version;
use tasklist_core::db::open_db_in_memory;
use tasklist_core::{ListCache, SqliteTaskRepository, TaskDraft, TaskService};

fn main() -> Result<(), Box<dyn Error>> {
    println!("tasklist_core ping={}", tasklist_core::ping());
    println!("tasklist_core version={}", tasklist_core::core_version());
    println!("tasklist_core schema_version={}", latest_version());

    let conn = open_db_in_memory()?;
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn)?);
    let mut cache = ListCache::new();

    let task = service.add_task(&TaskDraft::new(
        "smoke task",
        "Mon Jan 01 2024",
        "Wed Jan 10 2024",
    ))?;
    service.refresh(&mut cache)?;
    println!(
        "after add: pending={} completed={}",
        cache.pending().len(),
        cache.completed().len()
    );

    service.complete_task(task.id)?;
    service.refresh(&mut cache)?;
    println!(
        "after complete: pending={} completed={}",
        cache.pending().len(),
        cache.completed().len()
    );

    Ok(())
}

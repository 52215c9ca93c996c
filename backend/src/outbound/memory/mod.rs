//! In-process repositories.
//!
//! These back the server when no database URL is configured and give tests a
//! real store without PostgreSQL. They honour the same contracts as the
//! Diesel adapters: unique emails and community names, revision-checked
//! saves, and atomic view increments. Data lives as long as the process.

mod community;
mod lists;
mod users;

use std::sync::{Mutex, MutexGuard};

pub use community::MemoryCommunityListRepository;
pub use lists::MemoryPersonalListRepository;
pub use users::MemoryUserRepository;

/// Lock a collection, reporting poisoning as a message for the port error.
fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, String> {
    mutex
        .lock()
        .map_err(|_| "in-memory store lock poisoned".to_owned())
}

//! # Storage Module
//!
//! Repository abstractions for clothing items and wear logs.
//!
//! The domain layer only ever sees the traits in [`traits`]; the concrete
//! backend is chosen through a [`Connection`]. The in-memory backend in
//! [`memory`] is the one shipped here and is what the tests run against.
//!
//! ## Storage Contract
//!
//! - Items list newest `created_at` first
//! - Wear logs list newest `wear_date` first
//! - Deleting an item removes its wear logs as well

pub mod memory;
pub mod traits;

pub use memory::MemoryConnection;
pub use traits::{Connection, ItemStorage, WearLogStorage};

//! Flat back office records mirrored from store tables.
//!
//! # Responsibility
//! - Define the read models returned by repository fetches.
//! - Define insert requests accepted by repository writes.
//!
//! # Invariants
//! - Fetched records are read-only snapshots; there is no update path.
//! - Serialized field names and order are stable across releases.

pub mod account;
pub mod atm;
pub mod card;
pub mod entity;
pub mod service;

//! # Domain Models
//!
//! This crate contains pure data types with a single dependency (`serde`).
//! Keep it lean: no I/O, locking, or resolution logic. Just data and simple helpers.

pub mod config;
pub mod constants;
pub mod snapshot;

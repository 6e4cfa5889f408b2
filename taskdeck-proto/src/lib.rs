//! Wire types for the `taskdeck` board API.
//!
//! Defines the JSON data model shared with the remote task service:
//! tasks, users, comments, filter parameters, and authentication
//! payloads. Everything here is pure data — no I/O, no state.

pub mod auth;
pub mod comment;
pub mod filter;
pub mod task;
pub mod user;

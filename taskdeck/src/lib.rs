//! `taskdeck` — client library for a shared task board.
//!
//! The reconciliation core lives in [`board`]; [`gateway`] talks to the
//! remote service; [`app`] ties session, board, overlay, and filter
//! state together behind one owned struct.

pub mod app;
pub mod board;
pub mod config;
pub mod gateway;
pub mod overlay;
pub mod session;

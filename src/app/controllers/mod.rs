//! Controllers layer - orchestration and coordination.
//!
//! This module contains the logic that drives a session:
//! - The pure session reducer
//! - The auto-refresh loop

pub mod refresh;
pub mod session;

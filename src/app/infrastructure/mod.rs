//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Cancellation tokens handed to collaborator calls
//! - Platform-specific detection
//! - Error types

pub mod cancel;
pub mod error;
pub mod platform;

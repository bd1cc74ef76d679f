//! Services layer - business operations and collaborators.
//!
//! This module contains the two collaborators of a session:
//! - The key-value settings store
//! - The poetry source

pub mod poetry;
pub mod prefs;

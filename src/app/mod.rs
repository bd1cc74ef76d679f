//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Poem, Palette, Intents, ViewState)
//! - `controllers/` - Orchestration (session reducer, auto-refresh)
//! - `services/` - Collaborators (settings store, poetry source)
//! - `infrastructure/` - External integrations (cancellation, platform, error)
//! - `state.rs` - Session effect runner

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::refresh::run_watch;
pub use controllers::session::reduce;
pub use domain::{
    AppConfig, DisplayedPoem, Effect, FontChoice, Intent, Palette, PaletteEntry, Phase, Poem,
    PoemOrigin, Rgb, ThemeMode, ViewState,
};
pub use infrastructure::cancel::CancelToken;
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::platform::detect_system_dark_mode;
pub use services::poetry::{HttpPoetrySource, PoetrySource};
pub use services::prefs::{FileStore, MemoryStore, PrefKey, PrefValue, SettingsStore};
pub use state::Session;

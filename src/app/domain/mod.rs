//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Poems and the palette they are displayed with
//! - Application configuration, theme and font choice
//! - Intents, effects and the view state of the session

pub mod messages;
pub mod palette;
pub mod poem;
pub mod settings;
pub mod view_state;

pub use messages::{Effect, Intent};
pub use palette::{Palette, PaletteEntry, Rgb};
pub use poem::{Poem, PoemOrigin};
pub use settings::{AppConfig, FontChoice, ThemeMode};
pub use view_state::{DisplayedPoem, Phase, ViewState};

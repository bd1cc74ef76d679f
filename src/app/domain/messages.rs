use super::palette::PaletteEntry;
use super::poem::Poem;
use super::settings::FontChoice;

/// Everything that can be submitted to the session controller.
/// Front ends send the user-facing variants; the effect runner feeds back the
/// results of completed effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    // Lifecycle
    Init,
    Refresh,
    /// A collaborator call failed; the cycle is abandoned
    CycleAborted,

    // User
    SelectFont(FontChoice),
    SetDelay(u32),

    // Effect results
    FontLoaded(Option<FontChoice>),
    TokenLoaded(Option<String>),
    TokenAcquired(String),
    PoemLoaded { poem: Poem, colour: PaletteEntry },
}

/// Side effects requested by the reducer, executed in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadFont,
    LoadToken,
    RequestToken,
    PersistToken(String),
    FetchPoem(String),
    PersistFont(FontChoice),
}

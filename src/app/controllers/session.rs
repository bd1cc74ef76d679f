//! Session reducer: `(state, intent) -> (state, effects)`.
//!
//! Pure and synchronous. All I/O is described by the returned [`Effect`]s and
//! performed by [`crate::app::state::Session`], which feeds results back in as
//! further intents.

use tracing::{debug, warn};

use crate::app::domain::messages::{Effect, Intent};
use crate::app::domain::view_state::{DisplayedPoem, Phase, ViewState};

fn is_blank(token: &str) -> bool {
    token.trim().is_empty()
}

pub fn reduce(state: ViewState, intent: Intent) -> (ViewState, Vec<Effect>) {
    let mut next = state;

    let effects = match intent {
        Intent::Init | Intent::Refresh if next.phase.is_busy() => {
            debug!(phase = ?next.phase, "resolution already in flight, ignoring");
            Vec::new()
        }
        Intent::Init => {
            next.phase = Phase::ResolvingToken;
            next.token = None;
            vec![Effect::LoadFont, Effect::LoadToken]
        }
        Intent::Refresh => {
            // A refresh from Idle is the first cycle of the screen, so it loads
            // the font as well
            let first_cycle = next.phase == Phase::Idle;
            next.phase = Phase::ResolvingToken;
            next.token = None;
            if first_cycle {
                vec![Effect::LoadFont, Effect::LoadToken]
            } else {
                vec![Effect::LoadToken]
            }
        }

        Intent::FontLoaded(font) => {
            next.font = font.unwrap_or_default();
            Vec::new()
        }

        Intent::TokenLoaded(_) | Intent::TokenAcquired(_)
            if next.phase != Phase::ResolvingToken =>
        {
            debug!(phase = ?next.phase, "stale token result dropped");
            Vec::new()
        }
        Intent::TokenLoaded(stored) => match stored.filter(|t| !is_blank(t)) {
            Some(token) => {
                next.phase = Phase::FetchingPoem;
                next.token = Some(token.clone());
                vec![Effect::FetchPoem(token)]
            }
            None => vec![Effect::RequestToken],
        },
        Intent::TokenAcquired(token) => {
            next.phase = Phase::FetchingPoem;
            next.token = Some(token.clone());
            if is_blank(&token) {
                // Blank tokens are never persisted but the fetch still goes ahead
                warn!("poetry source returned a blank token");
                vec![Effect::FetchPoem(token)]
            } else {
                vec![Effect::PersistToken(token.clone()), Effect::FetchPoem(token)]
            }
        }

        Intent::PoemLoaded { .. } if next.phase != Phase::FetchingPoem => {
            debug!(phase = ?next.phase, "stale poem dropped");
            Vec::new()
        }
        Intent::PoemLoaded { poem, colour } => {
            next.poem = Some(DisplayedPoem::compose(&poem, colour, next.poem.as_ref()));
            next.phase = Phase::Displayed;
            Vec::new()
        }

        Intent::CycleAborted => {
            if next.phase.is_busy() {
                next.phase = if next.poem.is_some() {
                    Phase::Displayed
                } else {
                    Phase::Idle
                };
            }
            Vec::new()
        }

        Intent::SelectFont(font) if font == next.font => Vec::new(),
        Intent::SelectFont(font) => {
            next.font = font;
            vec![Effect::PersistFont(font)]
        }

        Intent::SetDelay(0) => {
            warn!("ignoring non-positive refresh delay");
            Vec::new()
        }
        Intent::SetDelay(secs) => {
            next.delay_secs = secs;
            Vec::new()
        }
    };

    (next, effects)
}

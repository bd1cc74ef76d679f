//! Effect runner that owns the collaborators of one screen session.
//!
//! Intents are queued FIFO. Each one is reduced, then the resulting effects
//! run in order; effects that produce a result feed it back as a new intent.
//! A resolution cycle therefore runs to completion inside one `dispatch` call:
//! `LoadToken -> (RequestToken -> PersistToken)? -> FetchPoem`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use super::controllers::session::reduce;
use super::domain::messages::{Effect, Intent};
use super::domain::palette::Palette;
use super::domain::settings::FontChoice;
use super::domain::view_state::{DisplayedPoem, ViewState};
use super::infrastructure::cancel::CancelToken;
use super::infrastructure::error::{AppError, Result};
use super::services::poetry::PoetrySource;
use super::services::prefs::{self, SettingsStore};

pub struct Session<S, P> {
    state: ViewState,
    store: S,
    source: P,
    palette: Palette,
    rng: StdRng,
    cancel: CancelToken,
}

impl<S: SettingsStore, P: PoetrySource> Session<S, P> {
    pub fn new(store: S, source: P, palette: Palette, delay_secs: u32) -> Self {
        Self {
            state: ViewState::new(delay_secs),
            store,
            source,
            palette,
            rng: StdRng::from_entropy(),
            cancel: CancelToken::new(),
        }
    }

    /// Replace the random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Handle that cancels this session's in-flight and future work.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Start of a screen activation: load the font, then resolve and display a poem.
    pub fn activate(&mut self) -> Result<&ViewState> {
        info!("session activated");
        self.dispatch(Intent::Init)
    }

    /// Run one token-resolution cycle and return the poem it published.
    pub fn resolve_and_load(&mut self) -> Result<DisplayedPoem> {
        self.dispatch(Intent::Refresh)?;
        self.state
            .poem
            .clone()
            .ok_or_else(|| AppError::Poetry("no poem was published".to_string()))
    }

    /// Persist and apply a font selection.
    pub fn select_font(&mut self, font: FontChoice) -> Result<&ViewState> {
        self.dispatch(Intent::SelectFont(font))
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<&ViewState> {
        let mut queue = VecDeque::from([intent]);

        while let Some(intent) = queue.pop_front() {
            let (next, effects) = reduce(self.state.clone(), intent);
            self.state = next;

            for effect in effects {
                match self.run(effect) {
                    Ok(Some(follow_up)) => queue.push_back(follow_up),
                    Ok(None) => {}
                    Err(e) => {
                        warn!(error = %e, phase = ?self.state.phase, "resolution cycle aborted");
                        let (next, _) = reduce(self.state.clone(), Intent::CycleAborted);
                        self.state = next;
                        return Err(e);
                    }
                }
            }
        }

        Ok(&self.state)
    }

    fn run(&mut self, effect: Effect) -> Result<Option<Intent>> {
        self.cancel.check()?;
        debug!(?effect, "running effect");

        let follow_up = match effect {
            Effect::LoadFont => Some(Intent::FontLoaded(prefs::read_font(&self.store)?)),
            Effect::LoadToken => Some(Intent::TokenLoaded(prefs::read_token(&self.store)?)),
            Effect::RequestToken => {
                Some(Intent::TokenAcquired(self.source.request_token(&self.cancel)?))
            }
            Effect::PersistToken(token) => {
                prefs::write_token(&self.store, &token)?;
                None
            }
            Effect::FetchPoem(token) => {
                let poem = self.source.fetch_poem(&token, &self.cancel)?;
                let colour = self.palette.choose(&mut self.rng).clone();
                Some(Intent::PoemLoaded { poem, colour })
            }
            Effect::PersistFont(font) => {
                prefs::write_font(&self.store, font)?;
                None
            }
        };

        Ok(follow_up)
    }
}

impl<S, P> Drop for Session<S, P> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

//! Auto-refresh loop: publish a poem, wait for the session's delay, refresh.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::app::domain::messages::Intent;
use crate::app::domain::view_state::ViewState;
use crate::app::infrastructure::error::Result;
use crate::app::services::poetry::PoetrySource;
use crate::app::services::prefs::SettingsStore;
use crate::app::state::Session;

/// Longest the wait blocks on the inbox before re-checking cancellation.
const POLL_SLICE: Duration = Duration::from_millis(100);

/// Activate `session` and keep refreshing it every `delay_secs` seconds.
///
/// `publish` receives every displayed state and returns `false` to stop.
/// `cycles` bounds the number of publications; `None` runs until cancelled.
///
/// Intents arriving on `inbox` while waiting are handled at once. `Refresh`
/// ends the wait early. Anything else is dispatched to the session, so a
/// `SetDelay` re-arms the running wait against the new delay. Once every
/// sender is gone the wait falls back to a plain cancellable sleep.
pub fn run_watch<S, P, F>(
    session: &mut Session<S, P>,
    inbox: &Receiver<Intent>,
    cycles: Option<u32>,
    mut publish: F,
) -> Result<()>
where
    S: SettingsStore,
    P: PoetrySource,
    F: FnMut(&ViewState) -> bool,
{
    let mut published = 0u32;

    let mut state = session.activate()?.clone();
    loop {
        published += 1;
        if !publish(&state) {
            info!(published, "watch stopped by front end");
            return Ok(());
        }
        if cycles.is_some_and(|limit| published >= limit) {
            info!(published, "watch finished");
            return Ok(());
        }

        wait_for_next_cycle(session, inbox)?;
        session.resolve_and_load()?;
        state = session.state().clone();
    }
}

fn wait_for_next_cycle<S, P>(session: &mut Session<S, P>, inbox: &Receiver<Intent>) -> Result<()>
where
    S: SettingsStore,
    P: PoetrySource,
{
    let cancel = session.cancel_token();
    let started = Instant::now();

    loop {
        cancel.check()?;
        let deadline = started + Duration::from_secs(u64::from(session.state().delay_secs));
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }

        match inbox.recv_timeout(POLL_SLICE.min(deadline - now)) {
            Ok(Intent::Refresh) => {
                debug!("refresh requested, cutting wait short");
                return Ok(());
            }
            Ok(intent) => {
                debug!(?intent, "intent received while waiting");
                session.dispatch(intent)?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return cancel.sleep(deadline - now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::palette::Palette;
    use crate::app::domain::poem::{Poem, PoemOrigin};
    use crate::app::domain::view_state::Phase;
    use crate::app::infrastructure::cancel::CancelToken;
    use crate::app::infrastructure::error::AppError;
    use crate::app::services::prefs::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{self, Sender};

    struct CountingSource {
        fetches: AtomicUsize,
    }

    impl PoetrySource for CountingSource {
        fn request_token(&self, _cancel: &CancelToken) -> Result<String> {
            Ok("tok".to_string())
        }

        fn fetch_poem(&self, _token: &str, _cancel: &CancelToken) -> Result<Poem> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Poem {
                content: format!("poem {}", n),
                origin: PoemOrigin {
                    title: "t".to_string(),
                    dynasty: "d".to_string(),
                    author: "a".to_string(),
                    content: Vec::new(),
                },
            })
        }
    }

    fn session_with_delay(delay_secs: u32) -> Session<MemoryStore, CountingSource> {
        let source = CountingSource {
            fetches: AtomicUsize::new(0),
        };
        Session::new(MemoryStore::new(), source, Palette::load(None, false).unwrap(), delay_secs)
    }

    fn session() -> Session<MemoryStore, CountingSource> {
        session_with_delay(1)
    }

    /// An inbox whose sender is already gone.
    fn closed_inbox() -> Receiver<Intent> {
        let (_tx, rx) = mpsc::channel();
        rx
    }

    fn open_inbox() -> (Sender<Intent>, Receiver<Intent>) {
        mpsc::channel()
    }

    #[test]
    fn test_single_cycle_does_not_sleep() {
        let mut session = session();
        let mut seen = Vec::new();

        run_watch(&mut session, &closed_inbox(), Some(1), |state| {
            seen.push(state.poem.clone().unwrap().content);
            true
        })
        .unwrap();

        assert_eq!(seen, vec!["poem 0"]);
    }

    #[test]
    fn test_refreshes_after_delay() {
        let mut session = session();
        let mut seen = Vec::new();

        run_watch(&mut session, &closed_inbox(), Some(2), |state| {
            assert_eq!(state.phase, Phase::Displayed);
            seen.push(state.poem.clone().unwrap().content);
            true
        })
        .unwrap();

        assert_eq!(seen, vec!["poem 0", "poem 1"]);
    }

    #[test]
    fn test_publish_can_stop_the_loop() {
        let mut session = session();
        let mut count = 0;

        run_watch(&mut session, &closed_inbox(), None, |_| {
            count += 1;
            false
        })
        .unwrap();

        assert_eq!(count, 1);
    }

    #[test]
    fn test_cancel_interrupts_wait() {
        let mut session = session();
        let cancel = session.cancel_token();

        let (_tx, inbox) = open_inbox();

        let result = run_watch(&mut session, &inbox, None, |_| {
            cancel.cancel();
            true
        });

        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[test]
    fn test_refresh_intent_cuts_wait_short() {
        let mut session = session_with_delay(30);
        let (tx, inbox) = open_inbox();
        let mut seen = Vec::new();
        let started = Instant::now();

        run_watch(&mut session, &inbox, Some(2), |state| {
            seen.push(state.poem.clone().unwrap().content);
            tx.send(Intent::Refresh).unwrap();
            true
        })
        .unwrap();

        assert_eq!(seen, vec!["poem 0", "poem 1"]);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_set_delay_rearms_running_wait() {
        let mut session = session_with_delay(30);
        let (tx, inbox) = open_inbox();
        tx.send(Intent::SetDelay(1)).unwrap();
        let mut delays = Vec::new();
        let started = Instant::now();

        run_watch(&mut session, &inbox, Some(3), |state| {
            delays.push(state.delay_secs);
            true
        })
        .unwrap();

        assert_eq!(delays, vec![30, 1, 1]);
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_zero_delay_from_inbox_is_ignored() {
        let mut session = session();
        let (tx, inbox) = open_inbox();
        tx.send(Intent::SetDelay(0)).unwrap();
        let mut delays = Vec::new();

        run_watch(&mut session, &inbox, Some(2), |state| {
            delays.push(state.delay_secs);
            true
        })
        .unwrap();

        assert_eq!(delays, vec![1, 1]);
    }
}

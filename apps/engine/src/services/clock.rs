//! Async driver that ticks a shared session once per period.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::domain::state::Phase;
use crate::domain::timer::Tick;
use crate::services::session::GameSession;

/// Why the clock task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStop {
    /// The countdown reached zero and opened the vote.
    Expired,
    /// The round left discussion or was replaced (early vote, restart, next
    /// round).
    RoundLeftPlaying,
    Cancelled,
}

/// Handle to a running round clock.
#[derive(Debug)]
pub struct RoundClock {
    token: CancellationToken,
    handle: JoinHandle<ClockStop>,
}

impl RoundClock {
    /// Stop the clock. Safe to call any number of times.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the clock task to end.
    pub async fn join(self) -> Result<ClockStop, JoinError> {
        self.handle.await
    }
}

/// Spawn a clock for the session's current round.
///
/// While the round is still revealing the clock idles; once discussion runs
/// it ticks every `period`, and it ends by itself when the round leaves
/// `Playing` or is replaced by another round. The session lock is never held
/// across an await.
pub fn spawn_round_clock(session: Arc<Mutex<GameSession>>, period: Duration) -> RoundClock {
    let generation = session.lock().round_generation();
    let token = CancellationToken::new();
    let child = token.clone();

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = child.cancelled() => {
                    debug!("Round clock cancelled");
                    return ClockStop::Cancelled;
                }
                _ = interval.tick() => {}
            }

            if let Some(stop) = step(&session, generation) {
                return stop;
            }
        }
    });

    RoundClock { token, handle }
}

/// One tick against the session; `Some` when the clock should end.
fn step(session: &Mutex<GameSession>, generation: u64) -> Option<ClockStop> {
    let mut session = session.lock();
    if session.round_generation() != generation {
        debug!("Round clock stopped: round was replaced");
        return Some(ClockStop::RoundLeftPlaying);
    }
    match session.round_phase() {
        Some(Phase::Reveal) => return None,
        Some(Phase::Playing) => {}
        _ => {
            debug!("Round clock stopped: round left discussion");
            return Some(ClockStop::RoundLeftPlaying);
        }
    }
    match session.tick() {
        Ok(Tick::Running { remaining_secs }) => {
            trace!(remaining_secs, "Clock tick");
            None
        }
        Ok(Tick::Expired) => {
            debug!("Round clock stopped: time is up");
            Some(ClockStop::Expired)
        }
        Ok(Tick::Ignored) | Err(_) => {
            debug!("Round clock stopped: tick not accepted");
            Some(ClockStop::RoundLeftPlaying)
        }
    }
}

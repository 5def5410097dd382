//! Async driver for the match session.
//!
//! The controller itself is pure; this wrapper owns it behind a mutex,
//! schedules the reveal delay after each second flip, and pushes gameplay
//! events to the presentation layer over a channel. Resolutions scheduled
//! before a reset settle as no-ops thanks to the session's generation guard.

use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, mpsc};
use tokio::time::sleep;
use tracing::debug;

use crate::state::deck::Deck;
use crate::state::session::{
    Completion, MatchSession, PendingResolution, ResolutionOutcome, Settled, TapOutcome,
};

/// Delay before a matched pair locks in place.
const MATCH_REVEAL_DELAY: Duration = Duration::from_millis(500);
/// Delay before a mismatched pair flips back down.
const MISMATCH_HIDE_DELAY: Duration = Duration::from_millis(1500);

/// How long a resolution stays on display before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionDelays {
    /// Reveal time before a match locks in.
    pub matched: Duration,
    /// Reveal time before a mismatch flips back.
    pub mismatched: Duration,
}

impl ResolutionDelays {
    /// Zero delays, settling resolutions as soon as the task runs.
    pub const fn immediate() -> Self {
        Self {
            matched: Duration::ZERO,
            mismatched: Duration::ZERO,
        }
    }

    fn for_outcome(&self, outcome: ResolutionOutcome) -> Duration {
        match outcome {
            ResolutionOutcome::Matched => self.matched,
            ResolutionOutcome::Mismatched => self.mismatched,
        }
    }
}

impl Default for ResolutionDelays {
    fn default() -> Self {
        Self {
            matched: MATCH_REVEAL_DELAY,
            mismatched: MISMATCH_HIDE_DELAY,
        }
    }
}

/// Gameplay side effects pushed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// First tap of the game; the clock starts now.
    TimerStarted,
    /// A content group was found and locked in.
    PairMatched {
        /// Content id of the found group.
        content_id: u32,
        /// Board indices of every instance in the group.
        indices: Vec<usize>,
    },
    /// A mismatched attempt flipped back down.
    MismatchHidden {
        /// Board indices of the two reverted cards.
        indices: [usize; 2],
    },
    /// The last group was found. Emitted once per game.
    Completed(Completion),
}

/// Handle owning one match session and its scheduled resolutions.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<MatchSession>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    delays: ResolutionDelays,
}

impl SessionHandle {
    /// Start a session over `deck`, returning the handle and the event stream.
    pub fn new(
        deck: Deck,
        delays: ResolutionDelays,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let handle = Self {
            session: Arc::new(Mutex::new(MatchSession::new(deck))),
            events,
            delays,
        };
        (handle, receiver)
    }

    /// Forward one tap to the controller, scheduling the settle when the tap
    /// completes a pair attempt.
    pub async fn tap(&self, index: usize) -> TapOutcome {
        let outcome = {
            let mut session = self.session.lock().await;
            session.tap(index)
        };

        match outcome {
            TapOutcome::FirstFlipped {
                timer_started: true,
                ..
            } => {
                let _ = self.events.send(SessionEvent::TimerStarted);
            }
            TapOutcome::Resolving(pending) => self.schedule_settle(pending),
            _ => {}
        }

        outcome
    }

    /// Discard the game and start over on a fresh deck.
    ///
    /// In-flight settle tasks from before the reset become no-ops.
    pub async fn reset(&self, deck: Deck) {
        let mut session = self.session.lock().await;
        session.reset(deck);
    }

    /// Read the session state under the lock.
    pub async fn with_session<T>(&self, read: impl FnOnce(&MatchSession) -> T) -> T {
        let session = self.session.lock().await;
        read(&session)
    }

    fn schedule_settle(&self, pending: PendingResolution) {
        let session = Arc::clone(&self.session);
        let events = self.events.clone();
        let delay = self.delays.for_outcome(pending.outcome);

        tokio::spawn(async move {
            sleep(delay).await;

            let settled = {
                let mut session = session.lock().await;
                session.settle(pending)
            };

            let Some(settled) = settled else {
                debug!(?pending, "discarding stale resolution");
                return;
            };

            match settled {
                Settled::Matched {
                    content_id,
                    indices,
                    completion,
                } => {
                    let _ = events.send(SessionEvent::PairMatched {
                        content_id,
                        indices,
                    });
                    if let Some(completion) = completion {
                        let _ = events.send(SessionEvent::Completed(completion));
                    }
                }
                Settled::Mismatched { indices } => {
                    let _ = events.send(SessionEvent::MismatchHidden { indices });
                }
            }
        });
    }
}

//! Match session controller: the single source of truth for which cards are
//! revealed, matched, or hidden, and for when the game ends.

use std::time::{Duration, Instant};

use crate::state::deck::Deck;

/// Per-card mutable flags, index-aligned with the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardState {
    /// Whether the card is currently face up.
    pub is_flipped: bool,
    /// Whether the card is locked into a found group. Implies `is_flipped`.
    pub is_matched: bool,
}

/// High-level phase of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No unmatched card is face up.
    Idle,
    /// Exactly one unmatched card is face up.
    OneFlipped {
        /// Board index of the face-up card.
        first: usize,
    },
    /// Two cards are face up and a resolution is pending; input is locked.
    Resolving,
    /// Every group has been found. Terminal.
    Complete,
}

/// Outcome decided the moment the second card flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Both cards share a content id.
    Matched,
    /// The cards differ and will flip back.
    Mismatched,
}

/// A resolution that has been decided but not yet applied.
///
/// The presentation layer holds on to this while the reveal delay runs, then
/// hands it back through [`MatchSession::settle`]. The embedded generation
/// makes a pending resolution from before a reset settle as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    /// Board index of the first flipped card.
    pub first: usize,
    /// Board index of the second flipped card.
    pub second: usize,
    /// Whether the pair matched.
    pub outcome: ResolutionOutcome,
    generation: u64,
}

/// Result of feeding one tap event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The tap was a no-op (locked board, face-up card, finished game).
    Ignored,
    /// The tap flipped the first card of a pair attempt.
    FirstFlipped {
        /// Board index of the flipped card.
        index: usize,
        /// True on the very first tap of the session, when the timer starts.
        timer_started: bool,
    },
    /// The tap flipped the second card; the board is locked until the
    /// returned resolution is settled.
    Resolving(PendingResolution),
}

/// Statistics reported exactly once, when the last group is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Completed two-card resolutions.
    pub moves: u32,
    /// Wall time between the first tap and the final match.
    pub elapsed: Duration,
    /// Groups found, equal to `total_pairs` here.
    pub matched_pairs: usize,
    /// Groups on the board.
    pub total_pairs: usize,
}

/// Effect of settling a pending resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// The cards matched and their whole content group is now locked in.
    Matched {
        /// Content id of the found group.
        content_id: u32,
        /// Board indices of every instance in the group.
        indices: Vec<usize>,
        /// Present on the final match of the session.
        completion: Option<Completion>,
    },
    /// The cards differed and flipped back down.
    Mismatched {
        /// Board indices of the two reverted cards.
        indices: [usize; 2],
    },
}

/// Stateful core of one game instance.
///
/// Pure and synchronous: taps mutate state immediately, while the delayed
/// half of a resolution is represented as a [`PendingResolution`] the caller
/// applies later. Exactly one of match-apply or mismatch-revert happens per
/// resolution, never both and never twice.
#[derive(Debug, Clone)]
pub struct MatchSession {
    deck: Deck,
    states: Vec<CardState>,
    moves: u32,
    matched_pairs: usize,
    total_pairs: usize,
    locked: bool,
    pending_first: Option<usize>,
    pending: Option<PendingResolution>,
    generation: u64,
    started_at: Option<Instant>,
    complete: bool,
}

impl MatchSession {
    /// Build a fresh session over a generated deck.
    pub fn new(deck: Deck) -> Self {
        let states = vec![CardState::default(); deck.len()];
        let total_pairs = deck.distinct_content_count();

        Self {
            deck,
            states,
            moves: 0,
            matched_pairs: 0,
            total_pairs,
            locked: false,
            pending_first: None,
            pending: None,
            generation: 0,
            started_at: None,
            complete: false,
        }
    }

    /// Discard all progress and start over on a fresh deck.
    ///
    /// Bumps the generation so pending resolutions issued before the reset
    /// settle as no-ops. Used both for "new game" and for difficulty changes.
    pub fn reset(&mut self, deck: Deck) {
        self.states = vec![CardState::default(); deck.len()];
        self.total_pairs = deck.distinct_content_count();
        self.deck = deck;
        self.moves = 0;
        self.matched_pairs = 0;
        self.locked = false;
        self.pending_first = None;
        self.pending = None;
        self.generation += 1;
        self.started_at = None;
        self.complete = false;
    }

    /// Process one tap on the card at `index`.
    ///
    /// Taps are ignored while the board is locked, on face-up or matched
    /// cards, and after completion. Out-of-range indices are a caller
    /// contract violation and panic.
    pub fn tap(&mut self, index: usize) -> TapOutcome {
        if self.locked || self.complete {
            return TapOutcome::Ignored;
        }

        let card = self.states[index];
        if card.is_flipped || card.is_matched {
            return TapOutcome::Ignored;
        }

        let timer_started = self.started_at.is_none();
        if timer_started {
            self.started_at = Some(Instant::now());
        }

        self.states[index].is_flipped = true;

        let Some(first) = self.pending_first else {
            self.pending_first = Some(index);
            return TapOutcome::FirstFlipped {
                index,
                timer_started,
            };
        };

        // Second card of the attempt: the outcome is decided now, its
        // effects are applied when the caller settles after the delay.
        self.moves += 1;
        self.locked = true;

        let outcome = if self.deck.content_id(first) == self.deck.content_id(index) {
            ResolutionOutcome::Matched
        } else {
            ResolutionOutcome::Mismatched
        };

        let pending = PendingResolution {
            first,
            second: index,
            outcome,
            generation: self.generation,
        };
        self.pending = Some(pending);

        TapOutcome::Resolving(pending)
    }

    /// Apply a previously issued resolution.
    ///
    /// Returns `None` when the resolution is stale (issued before a reset) or
    /// does not correspond to the pending one, leaving all state untouched.
    pub fn settle(&mut self, pending: PendingResolution) -> Option<Settled> {
        if pending.generation != self.generation {
            return None;
        }

        let current = self.pending.take()?;
        if current != pending {
            self.pending = Some(current);
            return None;
        }

        self.pending_first = None;
        self.locked = false;

        match pending.outcome {
            ResolutionOutcome::Matched => {
                let content_id = self.deck.content_id(pending.first);
                let mut indices = Vec::new();
                for index in 0..self.deck.len() {
                    if self.deck.content_id(index) == content_id {
                        self.states[index] = CardState {
                            is_flipped: true,
                            is_matched: true,
                        };
                        indices.push(index);
                    }
                }

                self.matched_pairs += 1;

                let completion = if self.matched_pairs == self.total_pairs && !self.complete {
                    self.complete = true;
                    Some(Completion {
                        moves: self.moves,
                        elapsed: self.elapsed(),
                        matched_pairs: self.matched_pairs,
                        total_pairs: self.total_pairs,
                    })
                } else {
                    None
                };

                Some(Settled::Matched {
                    content_id,
                    indices,
                    completion,
                })
            }
            ResolutionOutcome::Mismatched => {
                self.states[pending.first].is_flipped = false;
                self.states[pending.second].is_flipped = false;

                Some(Settled::Mismatched {
                    indices: [pending.first, pending.second],
                })
            }
        }
    }

    /// Current phase of the session.
    pub fn phase(&self) -> Phase {
        if self.complete {
            Phase::Complete
        } else if self.pending.is_some() {
            Phase::Resolving
        } else if let Some(first) = self.pending_first {
            Phase::OneFlipped { first }
        } else {
            Phase::Idle
        }
    }

    /// Deck this session plays on.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Per-card flags, index-aligned with the deck.
    pub fn card_states(&self) -> &[CardState] {
        &self.states
    }

    /// Completed two-card resolutions so far.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Groups found so far.
    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    /// Groups on the board.
    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    /// Whether taps are currently being ignored pending a resolution.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Wall time since the first tap, zero before the timer starts.
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::deck::{CardDefinition, CardInstance, Deck};

    /// Deck with the given content ids in board order.
    fn deck_of(content_ids: &[u32]) -> Deck {
        let cards = content_ids
            .iter()
            .enumerate()
            .map(|(position, &content_id)| CardInstance {
                instance_id: position as u32 + 1,
                definition: CardDefinition {
                    content_id,
                    icon: format!("icon-{content_id}"),
                    tip: format!("tip {content_id}"),
                    image: None,
                },
            })
            .collect();
        Deck::from_cards(cards)
    }

    /// 3 pairs laid out so matching and mismatching indices are known.
    fn three_pair_session() -> MatchSession {
        MatchSession::new(deck_of(&[1, 1, 2, 2, 3, 3]))
    }

    fn resolving(outcome: TapOutcome) -> PendingResolution {
        match outcome {
            TapOutcome::Resolving(pending) => pending,
            other => panic!("expected resolving outcome, got {other:?}"),
        }
    }

    fn assert_matched_implies_flipped(session: &MatchSession) {
        for (index, card) in session.card_states().iter().enumerate() {
            assert!(
                !card.is_matched || card.is_flipped,
                "card {index} is matched but not flipped"
            );
        }
    }

    #[test]
    fn fresh_session_is_idle() {
        let session = three_pair_session();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.matched_pairs(), 0);
        assert_eq!(session.total_pairs(), 3);
        assert!(!session.is_locked());
    }

    #[test]
    fn first_tap_flips_and_starts_the_timer() {
        let mut session = three_pair_session();

        let outcome = session.tap(0);
        assert_eq!(
            outcome,
            TapOutcome::FirstFlipped {
                index: 0,
                timer_started: true
            }
        );
        assert_eq!(session.phase(), Phase::OneFlipped { first: 0 });
        assert!(session.card_states()[0].is_flipped);
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn timer_starts_only_once_per_session() {
        let mut session = three_pair_session();

        session.tap(0);
        let pending = resolving(session.tap(2));
        session.settle(pending).unwrap();

        match session.tap(0) {
            TapOutcome::FirstFlipped { timer_started, .. } => assert!(!timer_started),
            other => panic!("expected first flip, got {other:?}"),
        }
    }

    #[test]
    fn matching_pair_locks_in_and_unlocks_the_board() {
        let mut session = three_pair_session();

        session.tap(0);
        let pending = resolving(session.tap(1));
        assert_eq!(pending.outcome, ResolutionOutcome::Matched);
        assert!(session.is_locked());
        assert_eq!(session.moves(), 1);

        let settled = session.settle(pending).unwrap();
        match settled {
            Settled::Matched {
                content_id,
                indices,
                completion,
            } => {
                assert_eq!(content_id, 1);
                assert_eq!(indices, vec![0, 1]);
                assert!(completion.is_none());
            }
            other => panic!("expected match, got {other:?}"),
        }

        assert_eq!(session.matched_pairs(), 1);
        assert!(session.card_states()[0].is_matched);
        assert!(session.card_states()[1].is_matched);
        assert!(!session.is_locked());
        assert_eq!(session.phase(), Phase::Idle);
        assert_matched_implies_flipped(&session);

        // A follow-up tap opens a new attempt.
        session.tap(2);
        assert_eq!(session.phase(), Phase::OneFlipped { first: 2 });
    }

    #[test]
    fn mismatch_reverts_both_cards_after_settle() {
        let mut session = three_pair_session();

        session.tap(0);
        let pending = resolving(session.tap(2));
        assert_eq!(pending.outcome, ResolutionOutcome::Mismatched);
        assert_eq!(session.moves(), 1);

        let settled = session.settle(pending).unwrap();
        assert_eq!(
            settled,
            Settled::Mismatched { indices: [0, 2] }
        );

        assert_eq!(session.matched_pairs(), 0);
        assert!(!session.card_states()[0].is_flipped);
        assert!(!session.card_states()[2].is_flipped);
        assert!(!session.is_locked());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn taps_are_ignored_while_a_resolution_is_pending() {
        let mut session = three_pair_session();

        session.tap(0);
        let pending = resolving(session.tap(2));

        let before = session.card_states().to_vec();
        assert_eq!(session.tap(4), TapOutcome::Ignored);
        assert_eq!(session.card_states(), before.as_slice());
        assert_eq!(session.moves(), 1);

        session.settle(pending).unwrap();
    }

    #[test]
    fn face_up_and_matched_cards_ignore_taps() {
        let mut session = three_pair_session();

        session.tap(0);
        assert_eq!(session.tap(0), TapOutcome::Ignored);

        let pending = resolving(session.tap(1));
        session.settle(pending).unwrap();
        assert_eq!(session.tap(0), TapOutcome::Ignored);
        assert_eq!(session.tap(1), TapOutcome::Ignored);
    }

    #[test]
    fn completion_is_emitted_exactly_once() {
        let mut session = three_pair_session();
        let attempts = [(0usize, 1usize), (2, 3), (4, 5)];

        let mut completions = 0;
        for (first, second) in attempts {
            session.tap(first);
            let pending = resolving(session.tap(second));
            match session.settle(pending).unwrap() {
                Settled::Matched { completion, .. } => {
                    if let Some(completion) = completion {
                        completions += 1;
                        assert_eq!(completion.matched_pairs, 3);
                        assert_eq!(completion.total_pairs, 3);
                        assert_eq!(completion.moves, 3);
                    }
                }
                other => panic!("expected match, got {other:?}"),
            }
            assert_matched_implies_flipped(&session);
        }

        assert_eq!(completions, 1);
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.tap(0), TapOutcome::Ignored);
    }

    #[test]
    fn settling_the_same_resolution_twice_is_a_no_op() {
        let mut session = three_pair_session();

        session.tap(0);
        let pending = resolving(session.tap(2));

        assert!(session.settle(pending).is_some());
        assert!(session.settle(pending).is_none());
        assert_eq!(session.moves(), 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut session = three_pair_session();
        session.tap(0);
        let pending = resolving(session.tap(1));
        session.settle(pending).unwrap();

        session.reset(deck_of(&[1, 1, 2, 2, 3, 3]));
        session.reset(deck_of(&[1, 1, 2, 2, 3, 3]));

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.matched_pairs(), 0);
        assert!(!session.is_locked());
        assert!(session.card_states().iter().all(|card| !card.is_flipped));
    }

    #[test]
    fn pending_resolutions_from_before_a_reset_are_stale() {
        let mut session = three_pair_session();

        session.tap(0);
        let pending = resolving(session.tap(1));

        session.reset(deck_of(&[4, 4, 5, 5]));

        assert!(session.settle(pending).is_none());
        assert_eq!(session.moves(), 0);
        assert_eq!(session.matched_pairs(), 0);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.card_states().iter().all(|card| !card.is_flipped));
    }

    #[test]
    fn group_match_locks_every_instance_of_the_content_id() {
        let mut session = MatchSession::new(deck_of(&[7, 7, 7, 8, 8, 8, 9, 9, 9]));
        assert_eq!(session.total_pairs(), 3);

        session.tap(0);
        let pending = resolving(session.tap(2));
        assert_eq!(pending.outcome, ResolutionOutcome::Matched);

        match session.settle(pending).unwrap() {
            Settled::Matched { indices, .. } => assert_eq!(indices, vec![0, 1, 2]),
            other => panic!("expected match, got {other:?}"),
        }

        assert!(session.card_states()[1].is_matched);
        assert_eq!(session.matched_pairs(), 1);
        assert_matched_implies_flipped(&session);
    }
}

//! Deck session orchestration over a [`DeckApi`].

use std::sync::atomic::{AtomicBool, Ordering};

use shared::{
    domain::{Card, DeckId},
    error::ApiError,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    session::{DeckSession, DeckSnapshot, Rejection},
    DeckApi, DEFAULT_DECK_COUNT,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum DeckEvent {
    SessionChanged(DeckSnapshot),
}

#[derive(Debug, Clone)]
pub enum InitOutcome {
    Ready {
        deck_id: DeckId,
        first_draw: DrawOutcome,
    },
    AlreadyInitialized,
    Failed(ApiError),
}

#[derive(Debug, Clone)]
pub enum ShuffleOutcome {
    Shuffled,
    Rejected(Rejection),
    Failed(ApiError),
}

#[derive(Debug, Clone)]
pub enum DrawOutcome {
    Drawn(Card),
    Exhausted,
    Rejected(Rejection),
    Failed(ApiError),
}

/// Owns the deck session and mediates every call to the card API.
///
/// Operations take `&self` so they can overlap: continuations always read the
/// deck id from the session at the moment they run, never from a copy taken
/// when the operation started. The lock is never held across a request.
pub struct DeckController<A: DeckApi> {
    api: A,
    deck_count: u32,
    session: Mutex<DeckSession>,
    initialized: AtomicBool,
    events: broadcast::Sender<DeckEvent>,
}

impl<A: DeckApi> DeckController<A> {
    pub fn new(api: A) -> Self {
        Self::with_deck_count(api, DEFAULT_DECK_COUNT)
    }

    pub fn with_deck_count(api: A, deck_count: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            deck_count: deck_count.max(1),
            session: Mutex::new(DeckSession::new()),
            initialized: AtomicBool::new(false),
            events,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> DeckSnapshot {
        self.session.lock().await.snapshot()
    }

    fn publish(&self, session: &DeckSession) {
        let _ = self
            .events
            .send(DeckEvent::SessionChanged(session.snapshot()));
    }

    /// Requests a new shuffled deck and draws the first card. Runs at most once
    /// per controller.
    pub async fn initialize(&self) -> InitOutcome {
        if self.initialized.swap(true, Ordering::SeqCst) {
            warn!("deck: initialize called more than once; ignoring");
            return InitOutcome::AlreadyInitialized;
        }

        let response = match self.api.new_shuffled_deck(self.deck_count).await {
            Ok(response) => response,
            Err(err) => {
                error!("deck: initialize failed: {err}");
                return InitOutcome::Failed(err.to_api_error());
            }
        };

        {
            let mut session = self.session.lock().await;
            session.set_deck(&response);
            self.publish(&session);
        }
        info!(
            deck_id = %response.deck_id,
            remaining = response.remaining,
            "deck: initialized"
        );

        let first_draw = self.draw_card().await;
        InitOutcome::Ready {
            deck_id: response.deck_id,
            first_draw,
        }
    }

    pub async fn shuffle(&self) -> ShuffleOutcome {
        let deck_id = {
            let mut session = self.session.lock().await;
            match session.begin_shuffle() {
                Ok(deck_id) => {
                    self.publish(&session);
                    deck_id
                }
                Err(rejection) => {
                    debug!(?rejection, "deck: shuffle rejected");
                    return ShuffleOutcome::Rejected(rejection);
                }
            }
        };

        info!(deck_id = %deck_id, "deck: shuffle");
        let result = self.api.reshuffle(&deck_id).await;

        let mut session = self.session.lock().await;
        match result {
            Ok(response) => {
                session.finish_shuffle(Some(response.remaining));
                self.publish(&session);
                ShuffleOutcome::Shuffled
            }
            Err(err) => {
                session.finish_shuffle(None);
                self.publish(&session);
                error!(deck_id = %deck_id, "deck: shuffle failed: {err}");
                ShuffleOutcome::Failed(err.to_api_error())
            }
        }
    }

    /// Draws one card. Overlapping draws are not serialized against each
    /// other; each result is applied when its response arrives.
    pub async fn draw_card(&self) -> DrawOutcome {
        let deck_id = match self.session.lock().await.begin_draw() {
            Ok(deck_id) => deck_id,
            Err(rejection) => {
                debug!(?rejection, "deck: draw rejected");
                return DrawOutcome::Rejected(rejection);
            }
        };

        let response = match self.api.draw(&deck_id, 1).await {
            Ok(response) => response,
            Err(err) => {
                error!(deck_id = %deck_id, "deck: draw failed: {err}");
                return DrawOutcome::Failed(err.to_api_error());
            }
        };

        let mut session = self.session.lock().await;
        let drawn = session.apply_draw(&response);
        self.publish(&session);
        let position = session.drawn_cards().len();
        drop(session);

        match drawn {
            Some(card) => {
                debug!(deck_id = %deck_id, position, card = %card.label(), "deck: card drawn");
                DrawOutcome::Drawn(card)
            }
            None => {
                debug!(deck_id = %deck_id, "deck: no cards remaining");
                DrawOutcome::Exhausted
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

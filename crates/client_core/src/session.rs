//! Deck session state and its transitions.
//!
//! The session is the single source of truth for rendering. Every transition
//! is a plain synchronous method so the controller can apply it atomically
//! under its lock and publish the resulting [`DeckSnapshot`].

use shared::{
    domain::{Card, DeckId},
    protocol::{DrawResponse, NewDeckResponse},
};

pub const EXHAUSTED_DECK_MESSAGE: &str = "Error: no cards remaining!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckPhase {
    #[default]
    Idle,
    Shuffling,
}

/// Why an action was refused without touching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Shuffling,
    NoDeck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSnapshot {
    pub deck_id: Option<DeckId>,
    pub drawn_cards: Vec<Card>,
    pub phase: DeckPhase,
    pub error: Option<String>,
    pub next_index: u32,
    pub remaining: Option<u32>,
}

impl DeckSnapshot {
    pub fn is_shuffling(&self) -> bool {
        self.phase == DeckPhase::Shuffling
    }
}

impl Default for DeckSnapshot {
    fn default() -> Self {
        DeckSession::new().snapshot()
    }
}

#[derive(Debug)]
pub struct DeckSession {
    deck_id: Option<DeckId>,
    drawn_cards: Vec<Card>,
    phase: DeckPhase,
    error: Option<String>,
    next_index: u32,
    remaining: Option<u32>,
}

impl Default for DeckSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckSession {
    pub fn new() -> Self {
        Self {
            deck_id: None,
            drawn_cards: Vec::new(),
            phase: DeckPhase::Idle,
            error: None,
            next_index: 1,
            remaining: None,
        }
    }

    pub fn deck_id(&self) -> Option<&DeckId> {
        self.deck_id.as_ref()
    }

    pub fn phase(&self) -> DeckPhase {
        self.phase
    }

    pub fn drawn_cards(&self) -> &[Card] {
        &self.drawn_cards
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_deck(&mut self, response: &NewDeckResponse) {
        self.deck_id = Some(response.deck_id.clone());
        self.remaining = Some(response.remaining);
    }

    /// Enters [`DeckPhase::Shuffling`] and drops every drawn card. Returns the
    /// deck the reshuffle request must target.
    pub fn begin_shuffle(&mut self) -> Result<DeckId, Rejection> {
        if self.phase == DeckPhase::Shuffling {
            return Err(Rejection::Shuffling);
        }
        let deck_id = self.deck_id.clone().ok_or(Rejection::NoDeck)?;
        self.phase = DeckPhase::Shuffling;
        self.drawn_cards.clear();
        self.error = None;
        Ok(deck_id)
    }

    /// Leaves [`DeckPhase::Shuffling`] whether or not the request succeeded.
    /// Cards cleared by [`Self::begin_shuffle`] are not restored.
    pub fn finish_shuffle(&mut self, remaining: Option<u32>) {
        self.phase = DeckPhase::Idle;
        if remaining.is_some() {
            self.remaining = remaining;
        }
    }

    pub fn begin_draw(&self) -> Result<DeckId, Rejection> {
        if self.phase == DeckPhase::Shuffling {
            return Err(Rejection::Shuffling);
        }
        self.deck_id.clone().ok_or(Rejection::NoDeck)
    }

    /// Appends the drawn card at the tail, or records the exhausted notice
    /// when the response carries no card.
    pub fn apply_draw(&mut self, response: &DrawResponse) -> Option<Card> {
        self.remaining = Some(response.remaining);
        match response.first_card() {
            Some(card) => {
                self.drawn_cards.push(card.clone());
                self.next_index += 1;
                Some(card.clone())
            }
            None => {
                self.error = Some(EXHAUSTED_DECK_MESSAGE.to_string());
                None
            }
        }
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            deck_id: self.deck_id.clone(),
            drawn_cards: self.drawn_cards.clone(),
            phase: self.phase,
            error: self.error.clone(),
            next_index: self.next_index,
            remaining: self.remaining,
        }
    }
}
